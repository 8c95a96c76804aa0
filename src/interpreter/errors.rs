//=============================================
// objgscript/interpreter/errors.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Runtime errors and unified script error codes
// Objective: Give every failure from lexing to evaluation a stable error code
//=============================================

use thiserror::Error;

use crate::codec::CodecError;
use crate::parser::ParseError;
use crate::tokenizer::LexError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Undefined symbol '{0}'")]
    UndefinedSymbol(String),
    #[error("{callee} expects {expected} argument(s) but received {found}")]
    ArgumentCount {
        callee: String,
        expected: usize,
        found: usize,
    },
    #[error("Value of kind {0} is not callable")]
    NotCallable(&'static str),
    #[error("Unknown operator '{0}'")]
    UnknownOperator(char),
    #[error("Type error: {0}")]
    TypeError(String),
    #[error("Invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("Call depth limit of {limit} exceeded")]
    StackOverflow { limit: usize },
    #[error("Cannot import '{path}': {message}")]
    Import { path: String, message: String },
    #[error("In '{path}': {error}")]
    InImport {
        path: String,
        error: Box<ScriptError>,
    },
    #[error("I/O error: {0}")]
    Io(String),
}

impl RuntimeError {
    pub fn code(&self) -> &'static str {
        runtime_error_code(self).as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Syntax,
    ModuleResolution,
    TypeMismatch,
    InvalidOperation,
    RuntimePanic,
    Codec,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Syntax => "E001",
            ErrorCode::ModuleResolution => "E002",
            ErrorCode::TypeMismatch => "E003",
            ErrorCode::InvalidOperation => "E004",
            ErrorCode::RuntimePanic => "E005",
            ErrorCode::Codec => "E006",
        }
    }
}

/// Any failure surfaced to a driver, tagged with its error code.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ScriptError {
    pub code: ErrorCode,
    pub message: String,
}

impl ScriptError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl From<LexError> for ScriptError {
    fn from(value: LexError) -> Self {
        ScriptError::new(ErrorCode::Syntax, value.to_string())
    }
}

impl From<ParseError> for ScriptError {
    fn from(value: ParseError) -> Self {
        ScriptError::new(ErrorCode::Syntax, value.to_string())
    }
}

impl From<CodecError> for ScriptError {
    fn from(value: CodecError) -> Self {
        ScriptError::new(ErrorCode::Codec, value.to_string())
    }
}

impl From<RuntimeError> for ScriptError {
    fn from(value: RuntimeError) -> Self {
        ScriptError::new(runtime_error_code(&value), value.to_string())
    }
}

pub fn runtime_error_code(error: &RuntimeError) -> ErrorCode {
    match error {
        RuntimeError::TypeError(_) | RuntimeError::InvalidNumber(_) => ErrorCode::TypeMismatch,
        RuntimeError::UndefinedSymbol(_)
        | RuntimeError::ArgumentCount { .. }
        | RuntimeError::NotCallable(_)
        | RuntimeError::UnknownOperator(_) => ErrorCode::InvalidOperation,
        RuntimeError::Import { .. } => ErrorCode::ModuleResolution,
        RuntimeError::InImport { error, .. } => error.code,
        RuntimeError::StackOverflow { .. } | RuntimeError::Io(_) => ErrorCode::RuntimePanic,
    }
}
