// ObjgScript native registry tests
// Covers: add-on registration, replacement, scope access, error propagation

#[path = "support/util.rs"]
mod util;

use std::cell::RefCell;

use objgscript::{
    lookup_native, register_native, registered_natives, ErrorCode, Interpreter, RuntimeError,
    Scope, Value,
};
use util::{interpreter, number};

thread_local! {
    static POINTS: RefCell<Vec<(f64, f64)>> = const { RefCell::new(Vec::new()) };
}

fn number_arg(args: &[Value], index: usize) -> Result<f64, RuntimeError> {
    args[index]
        .as_number()
        .ok_or_else(|| RuntimeError::TypeError(format!("argument {index} must be a number")))
}

fn point_new(_: &mut Interpreter, _: &Scope, args: &[Value]) -> Result<Value, RuntimeError> {
    let point = (number_arg(args, 0)?, number_arg(args, 1)?);
    let id = POINTS.with(|points| {
        let mut points = points.borrow_mut();
        points.push(point);
        points.len() - 1
    });
    Ok(Value::Number(id as f64))
}

fn point_x(_: &mut Interpreter, _: &Scope, args: &[Value]) -> Result<Value, RuntimeError> {
    let id = number_arg(args, 0)? as usize;
    POINTS
        .with(|points| points.borrow().get(id).map(|point| point.0))
        .map(Value::Number)
        .ok_or_else(|| RuntimeError::TypeError(format!("no point with id {id}")))
}

fn read_name(_: &mut Interpreter, scope: &Scope, args: &[Value]) -> Result<Value, RuntimeError> {
    let name = args[0]
        .as_str()
        .ok_or_else(|| RuntimeError::TypeError("expected a name".to_string()))?;
    scope.get(name)
}

fn answer_one(_: &mut Interpreter, _: &Scope, _: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Number(1.0))
}

fn answer_two(_: &mut Interpreter, _: &Scope, _: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Number(2.0))
}

#[test]
fn builtins_are_registered() {
    let names = registered_natives();
    for builtin in ["equals", "if", "import", "print", "str", "while"] {
        assert!(names.iter().any(|name| name == builtin), "missing {builtin}");
    }
    assert_eq!(lookup_native("if").map(|native| native.arity), Some(3));
    assert!(lookup_native("no_such_native").is_none());
}

#[test]
fn addon_natives_keep_side_tables() {
    register_native("point_new", 2, point_new);
    register_native("point_x", 1, point_x);

    let (mut interp, _) = interpreter();
    let root = interp.root();
    let result = interp
        .run_source("p = point_new(3, 4); q = point_new(7, 1); point_x(q) - point_x(p);", &root)
        .unwrap();
    assert_eq!(result, number(4.0));

    let err = interp.run_source("point_x(999);", &root).unwrap_err();
    assert_eq!(err.code, ErrorCode::TypeMismatch);
}

#[test]
fn registration_reaches_only_later_interpreters() {
    let (mut before, _) = interpreter();
    register_native("late_native", 0, answer_one);
    let (mut after, _) = interpreter();

    let root = before.root();
    assert_eq!(
        before.run_source("late_native();", &root).unwrap_err().code,
        ErrorCode::InvalidOperation
    );
    let root = after.root();
    assert_eq!(after.run_source("late_native();", &root).unwrap(), number(1.0));
}

#[test]
fn reregistering_replaces_previous_native() {
    assert!(!register_native("swap_native", 0, answer_one));
    assert!(register_native("swap_native", 0, answer_two));

    let (mut interp, _) = interpreter();
    let root = interp.root();
    assert_eq!(interp.run_source("swap_native();", &root).unwrap(), number(2.0));
}

#[test]
fn interpreter_registration_binds_immediately() {
    let (mut interp, _) = interpreter();
    interp.register_native("bound_now", 0, answer_one);
    let root = interp.root();
    assert_eq!(interp.run_source("bound_now();", &root).unwrap(), number(1.0));
}

#[test]
fn natives_receive_the_calling_scope() {
    let (mut interp, _) = interpreter();
    interp.register_native("read_name", 1, read_name);
    let root = interp.root();
    let source = "f = {@(hidden) read_name('hidden')}; f(11);";
    assert_eq!(interp.run_source(source, &root).unwrap(), number(11.0));
}

#[test]
fn native_arity_is_checked_before_the_call() {
    let (mut interp, _) = interpreter();
    interp.register_native("read_name_checked", 1, read_name);
    let root = interp.root();
    let err = interp.run_source("read_name_checked();", &root).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidOperation);
}
