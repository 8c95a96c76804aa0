//=============================================
// objgscript/interpreter/environment.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Lexical scopes for the ObjgScript interpreter
// Objective: Provide parent-chained, shared, mutable name tables
//=============================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::errors::RuntimeError;
use super::value::Value;

#[derive(Default)]
struct Environment {
    values: HashMap<String, Value>,
    parent: Option<Scope>,
}

/// Shared handle to a scope. A scope lives as long as any call frame, closure or
/// child scope still holds it.
#[derive(Clone, Default)]
pub struct Scope(Rc<RefCell<Environment>>);

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh scope whose parent is `self`.
    pub fn child(&self) -> Self {
        Scope(Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            parent: Some(self.clone()),
        })))
    }

    pub fn parent(&self) -> Option<Scope> {
        self.0.borrow().parent.clone()
    }

    pub fn get(&self, name: &str) -> Result<Value, RuntimeError> {
        let mut current = self.clone();
        loop {
            let parent = {
                let env = current.0.borrow();
                if let Some(value) = env.values.get(name) {
                    return Ok(value.clone());
                }
                env.parent.clone()
            };
            match parent {
                Some(parent) => current = parent,
                None => return Err(RuntimeError::UndefinedSymbol(name.to_string())),
            }
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.owner_of(name).is_some()
    }

    /// Overwrite the nearest existing binding, or create one in this scope.
    pub fn set(&self, name: &str, value: Value) {
        let target = self.owner_of(name).unwrap_or_else(|| self.clone());
        target.0.borrow_mut().values.insert(name.to_string(), value);
    }

    /// Bind `name` in this scope only, shadowing any ancestor binding.
    pub fn define(&self, name: &str, value: Value) {
        self.0.borrow_mut().values.insert(name.to_string(), value);
    }

    /// True if `name` is bound directly in this scope.
    pub fn has_local(&self, name: &str) -> bool {
        self.0.borrow().values.contains_key(name)
    }

    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn owner_of(&self, name: &str) -> Option<Scope> {
        let mut current = self.clone();
        loop {
            let parent = {
                let env = current.0.borrow();
                if env.values.contains_key(name) {
                    break;
                }
                env.parent.clone()
            };
            current = parent?;
        }
        Some(current)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env = self.0.borrow();
        let mut names: Vec<&String> = env.values.keys().collect();
        names.sort();
        f.debug_struct("Scope")
            .field("names", &names)
            .field("has_parent", &env.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_the_parent_chain() {
        let root = Scope::new();
        root.define("x", Value::Number(1.0));
        let child = root.child().child();
        assert_eq!(child.get("x").unwrap(), Value::Number(1.0));
        assert!(child.has("x"));
        assert!(!child.has("y"));
        assert_eq!(
            child.get("y").unwrap_err(),
            RuntimeError::UndefinedSymbol("y".to_string())
        );
    }

    #[test]
    fn set_updates_ancestor_in_place() {
        let root = Scope::new();
        root.define("x", Value::Number(1.0));
        let child = root.child();
        child.set("x", Value::Number(2.0));
        assert_eq!(root.get("x").unwrap(), Value::Number(2.0));
        assert!(!child.has_local("x"));
    }

    #[test]
    fn set_creates_new_names_in_innermost_scope() {
        let root = Scope::new();
        let child = root.child();
        child.set("y", Value::Number(5.0));
        assert!(child.has_local("y"));
        assert!(!root.has("y"));
    }

    #[test]
    fn define_shadows_ancestor() {
        let root = Scope::new();
        root.define("x", Value::Number(1.0));
        let child = root.child();
        child.define("x", Value::Number(9.0));
        assert_eq!(child.get("x").unwrap(), Value::Number(9.0));
        assert_eq!(root.get("x").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn child_keeps_parent_alive() {
        let child = {
            let root = Scope::new();
            root.define("kept", Value::from("yes"));
            root.child()
        };
        assert_eq!(child.get("kept").unwrap(), Value::from("yes"));
        assert!(child.parent().is_some());
    }

    #[test]
    fn child_parent_is_the_same_scope() {
        let root = Scope::new();
        let child = root.child();
        assert!(child.parent().is_some_and(|parent| parent.ptr_eq(&root)));
        assert!(!child.ptr_eq(&root));
        assert!(root.clone().ptr_eq(&root));
    }
}
