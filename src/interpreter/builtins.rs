//=============================================
// objgscript/interpreter/builtins.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Built-in native functions seeded into every root scope
// Objective: Provide print/str/import/equals and the thunk-based if/while
//=============================================

use std::collections::HashMap;

use super::{Interpreter, NativeFunction, RuntimeError, Scope, Value};

pub(crate) fn install(table: &mut HashMap<String, NativeFunction>) {
    let builtins: [(&str, usize, super::NativeFn); 6] = [
        ("print", 1, builtin_print),
        ("str", 1, builtin_str),
        ("import", 1, builtin_import),
        ("if", 3, builtin_if),
        ("while", 2, builtin_while),
        ("equals", 2, builtin_equals),
    ];
    for (name, arity, func) in builtins {
        table.insert(name.to_string(), NativeFunction::new(name, arity, func));
    }
}

fn expect_args<'a, const N: usize>(
    name: &str,
    args: &'a [Value],
) -> Result<&'a [Value; N], RuntimeError> {
    args.try_into().map_err(|_| RuntimeError::ArgumentCount {
        callee: name.to_string(),
        expected: N,
        found: args.len(),
    })
}

fn builtin_print(
    interpreter: &mut Interpreter,
    _scope: &Scope,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let [value] = expect_args("print", args)?;
    writeln!(interpreter.output(), "{value}").map_err(|err| RuntimeError::Io(err.to_string()))?;
    Ok(value.clone())
}

fn builtin_str(
    _interpreter: &mut Interpreter,
    _scope: &Scope,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let [value] = expect_args("str", args)?;
    Ok(Value::String(value.to_string()))
}

fn builtin_import(
    interpreter: &mut Interpreter,
    scope: &Scope,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let [path] = expect_args("import", args)?;
    let path = path.as_str().ok_or_else(|| {
        RuntimeError::TypeError(format!("import expects a string path, found {}", path.type_name()))
    })?;
    interpreter.import(path, scope)
}

// The condition is tested as given, so a function value is never `1`. Branches
// that are function values are forced through their captured scope, so the
// unselected `{...}` branch never runs.
fn builtin_if(
    interpreter: &mut Interpreter,
    scope: &Scope,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let [condition, when_true, when_false] = expect_args("if", args)?;
    let branch = if condition.is_truthy() {
        when_true
    } else {
        when_false
    };
    interpreter.force(branch, scope)
}

fn builtin_while(
    interpreter: &mut Interpreter,
    scope: &Scope,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let [condition, body] = expect_args("while", args)?;
    let mut last = Value::None;
    while interpreter.force(condition, scope)?.is_truthy() {
        last = interpreter.force(body, scope)?;
    }
    Ok(last)
}

fn builtin_equals(
    _interpreter: &mut Interpreter,
    _scope: &Scope,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let [left, right] = expect_args("equals", args)?;
    Ok(Value::from(left == right))
}
