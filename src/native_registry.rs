//==================================================
// File: native_registry.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Process-wide table of host functions callable from ObjgScript
// Objective: Let add-on modules register natives that every new root scope sees
//==================================================

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::interpreter::{install_builtins, NativeFn, NativeFunction};

//==================================================
// Section 1.0 - Registry Storage
//==================================================

static REGISTRY: Lazy<RwLock<HashMap<String, NativeFunction>>> = Lazy::new(|| {
    let mut table = HashMap::new();
    install_builtins(&mut table);
    RwLock::new(table)
});

//==================================================
// Section 2.0 - Registration & Lookup
//==================================================

/// Insert or replace a native. Returns `true` when an earlier registration with
/// the same name was replaced. Only interpreters created afterwards see it.
pub fn register_native(name: &str, arity: usize, func: NativeFn) -> bool {
    let previous = REGISTRY
        .write()
        .insert(name.to_string(), NativeFunction::new(name, arity, func));
    debug!(name, arity, replaced = previous.is_some(), "registered native");
    previous.is_some()
}

pub fn lookup_native(name: &str) -> Option<NativeFunction> {
    REGISTRY.read().get(name).cloned()
}

/// Names of every registered native, sorted.
pub fn registered_natives() -> Vec<String> {
    let mut names: Vec<String> = REGISTRY.read().keys().cloned().collect();
    names.sort();
    names
}

pub(crate) fn snapshot() -> Vec<NativeFunction> {
    REGISTRY.read().values().cloned().collect()
}

//==================================================
// Section 3.0 - Tests
//==================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{Interpreter, RuntimeError, Scope, Value};

    fn answer(_: &mut Interpreter, _: &Scope, _: &[Value]) -> Result<Value, RuntimeError> {
        Ok(Value::Number(42.0))
    }

    fn other_answer(_: &mut Interpreter, _: &Scope, _: &[Value]) -> Result<Value, RuntimeError> {
        Ok(Value::Number(7.0))
    }

    #[test]
    fn builtins_are_preregistered() {
        let names = registered_natives();
        for builtin in ["equals", "if", "import", "print", "str", "while"] {
            assert!(names.iter().any(|name| name == builtin), "missing {builtin}");
        }
    }

    #[test]
    fn later_registration_replaces_earlier() {
        assert!(!register_native("registry_test_answer", 0, answer));
        assert!(register_native("registry_test_answer", 1, other_answer));
        let native = lookup_native("registry_test_answer").unwrap();
        assert_eq!(native.arity, 1);
    }
}
