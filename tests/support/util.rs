#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use objgscript::{Interpreter, InterpreterConfig, ScriptError, Value};

/// Cloneable writer so tests can read what `print` produced.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn interpreter_with(config: InterpreterConfig) -> (Interpreter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let interpreter = Interpreter::with_output(config, Box::new(buffer.clone()));
    (interpreter, buffer)
}

pub fn interpreter() -> (Interpreter, SharedBuffer) {
    interpreter_with(InterpreterConfig::default())
}

pub fn run(source: &str) -> Result<Value, ScriptError> {
    run_with_output(source).0
}

pub fn run_with_output(source: &str) -> (Result<Value, ScriptError>, String) {
    let (mut interpreter, buffer) = interpreter();
    let root = interpreter.root();
    let result = interpreter.run_source(source, &root);
    (result, buffer.contents())
}

pub fn number(value: f64) -> Value {
    Value::Number(value)
}
