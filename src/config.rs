//! Interpreter configuration: defaults, TOML loading and the per-user config file.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the user's config dir holding ObjgScript settings.
const CONFIG_DIR: &str = "objgscript";
/// Default configuration file name.
const CONFIG_FILE: &str = "config.toml";

/// Runtime settings loaded from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Maximum nesting of function and native calls.
    pub max_call_depth: usize,
    /// Directories `import` searches after the literal path.
    pub search_paths: Vec<PathBuf>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 1000,
            search_paths: Vec::new(),
        }
    }
}

impl InterpreterConfig {
    /// Load configuration from an explicit file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading configuration from {}", path.display()))?;
        Self::from_toml(&data).with_context(|| format!("parsing configuration {}", path.display()))
    }

    pub fn from_toml(data: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(data)?)
    }

    /// Load the per-user configuration file, or defaults when it does not exist.
    pub fn load_default() -> anyhow::Result<(Self, Option<PathBuf>)> {
        let Some(path) = Self::default_path() else {
            return Ok((Self::default(), None));
        };
        if !path.exists() {
            return Ok((Self::default(), None));
        }
        let config = Self::load(&path)?;
        Ok((config, Some(path)))
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Persist the configuration back to disk.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let serialized = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {}", parent.display()))?;
        }
        fs::write(path, serialized)
            .with_context(|| format!("writing configuration to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = InterpreterConfig::from_toml("search_paths = [\"lib\"]").unwrap();
        assert_eq!(config.max_call_depth, 1000);
        assert_eq!(config.search_paths, vec![PathBuf::from("lib")]);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = InterpreterConfig {
            max_call_depth: 64,
            search_paths: vec![PathBuf::from("/opt/objg")],
        };
        config.save(&path).unwrap();
        assert_eq!(InterpreterConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(InterpreterConfig::from_toml("max_call_depth = \"deep\"").is_err());
    }
}
