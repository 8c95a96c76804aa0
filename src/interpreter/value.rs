//=============================================
// objgscript/interpreter/value.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: ObjgScript runtime value types
// Objective: Describe numbers, strings, closures and native function handles
//=============================================

use std::fmt;
use std::rc::Rc;

use super::environment::Scope;
use super::errors::RuntimeError;
use super::Interpreter;
use crate::ast::Node;

/// Host function signature. The scope of the call site comes first, followed by
/// the already-evaluated arguments.
pub type NativeFn = fn(&mut Interpreter, &Scope, &[Value]) -> Result<Value, RuntimeError>;

/// A host function registered under a name. `arity` counts only the script-visible
/// arguments, not the implicit scope.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub func: NativeFn,
}

impl NativeFunction {
    pub fn new(name: impl Into<String>, arity: usize, func: NativeFn) -> Self {
        Self {
            name: name.into(),
            arity,
            func,
        }
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// A user-defined function together with the scope it was created in.
pub struct Closure {
    pub params: Rc<[String]>,
    pub body: Rc<[Node]>,
    pub env: Scope,
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}

/// ObjgScript runtime value types
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    String(String),
    None,
    Function(Rc<Closure>),
    Native(NativeFunction),
}

impl Value {
    /// Only the number `1` is truthy.
    pub fn is_truthy(&self) -> bool {
        matches!(self, Value::Number(n) if *n == 1.0)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::None => "none",
            Value::Function(_) => "function",
            Value::Native(_) => "native",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::None, Value::None) => true,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Number(if value { 1.0 } else { 0.0 })
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::None => f.write_str("None"),
            Value::Function(closure) => write!(f, "<function/{}>", closure.params.len()),
            Value::Native(native) => write!(f, "<native {}>", native.name),
        }
    }
}
