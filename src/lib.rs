//=====================================================
// File: lib.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: ObjgScript library main interface
// Objective: Export the tokenizer, parser, AST, interpreter, native registry and
//            compiled-artifact codec, plus the compile/parse entry points
//=====================================================

pub mod ast;
pub mod codec;
pub mod config;
pub mod devtools;
pub mod interpreter;
pub mod native_registry;
pub mod parser;
pub mod stack;
pub mod tokenizer;

use tracing::debug;

pub use ast::{Node, Program};
pub use config::InterpreterConfig;
pub use interpreter::{ErrorCode, Interpreter, RuntimeError, Scope, ScriptError, Value};
pub use native_registry::{lookup_native, register_native, registered_natives};
pub use parser::{ParseError, Parser};
pub use tokenizer::{LexError, Token, TokenKind, Tokenizer};

/// Extension of ObjgScript source files.
pub const SOURCE_EXTENSION: &str = "objg";
/// Extension of compiled artifacts produced by [`compile`].
pub const COMPILED_EXTENSION: &str = "objgc";

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Tokenizer::new(source).tokenize()
}

pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    Parser::from_source(source).parse()
}

/// Parse `source` once and freeze it into a compiled artifact.
pub fn compile(source: &str) -> Result<Vec<u8>, ScriptError> {
    let program = parse_program(source)?;
    let bytes = codec::serialize(&program);
    debug!(
        statements = program.statements.len(),
        bytes = bytes.len(),
        "compiled program"
    );
    Ok(bytes)
}

//=====================================================
// End of file
//=====================================================
