// ObjgScript import tests
// Covers: source and compiled imports, search paths, caller-scope binding, failures

#[path = "support/util.rs"]
mod util;

use std::fs;
use std::path::Path;

use objgscript::{compile, ErrorCode, InterpreterConfig, Value};
use tempfile::tempdir;
use util::{interpreter, interpreter_with, number};

fn import_stmt(path: &Path) -> String {
    format!("import('{}');", path.display())
}

#[test]
fn source_import_binds_into_caller_scope() {
    let dir = tempdir().unwrap();
    let lib = dir.path().join("math.objg");
    fs::write(&lib, "double = {@(x) x * 2};\nloaded = 1;").unwrap();

    let (mut interp, _) = interpreter();
    let root = interp.root();
    let source = format!("{} double(4);", import_stmt(&lib));
    assert_eq!(interp.run_source(&source, &root).unwrap(), number(8.0));
    assert_eq!(root.get("loaded").unwrap(), number(1.0));
}

#[test]
fn import_returns_last_value() {
    let dir = tempdir().unwrap();
    let lib = dir.path().join("value.objg");
    fs::write(&lib, "'module ready';").unwrap();

    let (mut interp, _) = interpreter();
    let root = interp.root();
    let result = interp.run_source(&import_stmt(&lib), &root).unwrap();
    assert_eq!(result, Value::from("module ready"));
}

#[test]
fn import_inside_function_stays_local() {
    let dir = tempdir().unwrap();
    let lib = dir.path().join("local.objg");
    fs::write(&lib, "secret = 3;").unwrap();

    let (mut interp, _) = interpreter();
    let root = interp.root();
    let source = format!("load = {{{} secret}}; load();", import_stmt(&lib));
    assert_eq!(interp.run_source(&source, &root).unwrap(), number(3.0));
    assert!(!root.has("secret"));
}

#[test]
fn compiled_modules_can_be_imported() {
    let dir = tempdir().unwrap();
    let lib = dir.path().join("greet.objgc");
    fs::write(&lib, compile("greet = {@(name) print(name)};").unwrap()).unwrap();

    let (mut interp, output) = interpreter();
    let root = interp.root();
    let source = format!("{} greet('hi');", import_stmt(&lib));
    interp.run_source(&source, &root).unwrap();
    assert_eq!(output.contents(), "hi\n");
}

#[test]
fn search_paths_resolve_relative_imports() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("answer.objg"), "answer = 42;").unwrap();

    let config = InterpreterConfig {
        search_paths: vec![dir.path().to_path_buf()],
        ..InterpreterConfig::default()
    };
    let (mut interp, _) = interpreter_with(config);
    assert_eq!(interp.config().search_paths, vec![dir.path().to_path_buf()]);
    let root = interp.root();
    let result = interp
        .run_source("import('answer.objg'); answer;", &root)
        .unwrap();
    assert_eq!(result, number(42.0));
}

#[test]
fn missing_module_is_module_resolution_error() {
    let (mut interp, _) = interpreter();
    let root = interp.root();
    let err = interp
        .run_source("import('nowhere/at/all.objg');", &root)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ModuleResolution);
    assert!(err.message.contains("nowhere/at/all.objg"), "{}", err.message);
}

#[test]
fn errors_inside_module_keep_their_code() {
    let dir = tempdir().unwrap();
    let lib = dir.path().join("broken.objg");
    fs::write(&lib, "x = );").unwrap();

    let (mut interp, _) = interpreter();
    let root = interp.root();
    let err = interp.run_source(&import_stmt(&lib), &root).unwrap_err();
    assert_eq!(err.code, ErrorCode::Syntax);
    assert!(err.message.contains("broken.objg"), "{}", err.message);
}

#[test]
fn run_file_dispatches_on_extension() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("main.objg");
    let compiled = dir.path().join("main.objgc");
    fs::write(&source, "1 + 2;").unwrap();
    fs::write(&compiled, compile("3 + 4;").unwrap()).unwrap();

    let (mut interp, _) = interpreter();
    let root = interp.root();
    assert_eq!(interp.run_file(&source, &root).unwrap(), number(3.0));
    assert_eq!(interp.run_file(&compiled, &root).unwrap(), number(7.0));
}
