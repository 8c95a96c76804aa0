//=============================================
// objgscript/codec/mod.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Freeze parsed ObjgScript programs into portable compiled artifacts
// Objective: Map the AST to tagged JSON arrays and wrap the JSON in ASCII85
//=============================================

//=============================================
//            Section 1: Imports & Errors
//=============================================

pub mod ascii85;

use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use thiserror::Error;
use tracing::debug;

use crate::ast::{Node, Program};
use crate::parser::MAX_EXPRESSION_DEPTH;
use crate::stack::{ensure_sufficient_stack, with_stack_for_depth};

/// Deepest JSON nesting accepted from an artifact. A function body or argument
/// list costs two levels per expression level, plus the outer document.
pub const MAX_DOCUMENT_DEPTH: usize = 2 * MAX_EXPRESSION_DEPTH + 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid ASCII85 character '{character}' at byte {offset}")]
    InvalidCharacter { character: char, offset: usize },
    #[error("'z' inside an ASCII85 group at byte {offset}")]
    MisplacedZeroGroup { offset: usize },
    #[error("ASCII85 group ending at byte {offset} overflows 32 bits")]
    GroupOverflow { offset: usize },
    #[error("ASCII85 input ends with a single dangling character")]
    TruncatedGroup,
    #[error("compiled program is not valid JSON: {0}")]
    Json(String),
    #[error("malformed node: {0}")]
    Malformed(String),
    #[error("compiled program nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

//=============================================
//            Section 2: Artifact Encoding
//=============================================

/// Encode a program as ASCII85-wrapped JSON. The document is an array holding one
/// tagged array per top-level statement.
pub fn serialize(program: &Program) -> Vec<u8> {
    let depth = program.statements.iter().map(nesting).max().unwrap_or(0) + 1;
    let text = with_stack_for_depth(depth, || {
        let document =
            JsonValue::Array(program.statements.iter().map(node_to_json).collect());
        document.to_string()
    });
    debug!(
        statements = program.statements.len(),
        json_bytes = text.len(),
        "serialized program"
    );
    ascii85::encode(text.as_bytes())
}

/// Decode an artifact. Documents nested deeper than [`MAX_DOCUMENT_DEPTH`] are
/// rejected before parsing; the rest are parsed on a stack sized for their depth.
pub fn deserialize(bytes: &[u8]) -> Result<Program, CodecError> {
    let text = ascii85::decode(bytes)?;
    let depth = document_depth(&text);
    if depth > MAX_DOCUMENT_DEPTH {
        return Err(CodecError::TooDeep {
            limit: MAX_DOCUMENT_DEPTH,
        });
    }
    with_stack_for_depth(depth, || decode_document(&text))
}

fn decode_document(text: &[u8]) -> Result<Program, CodecError> {
    let mut deserializer = serde_json::Deserializer::from_slice(text);
    deserializer.disable_recursion_limit();
    let document =
        JsonValue::deserialize(&mut deserializer).map_err(|err| CodecError::Json(err.to_string()))?;
    deserializer
        .end()
        .map_err(|err| CodecError::Json(err.to_string()))?;
    let statements = node_list(&document)?;
    Ok(Program::new(statements))
}

// Bracket nesting of raw JSON text, ignoring brackets inside strings.
fn document_depth(text: &[u8]) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    let mut in_string = false;
    let mut escaped = false;
    for &byte in text {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

// Upper bound on the JSON nesting `node_to_json` produces for `node`.
fn nesting(node: &Node) -> usize {
    ensure_sufficient_stack(|| match node {
        Node::Operation { left, right, .. } => 1 + nesting(left).max(nesting(right)),
        Node::Call { callee, args } => {
            1 + nesting(callee).max(2 + args.iter().map(nesting).max().unwrap_or(0))
        }
        Node::Function { body, .. } => 3 + body.iter().map(nesting).max().unwrap_or(0),
        Node::Assignment { value, .. } => 2 + nesting(value),
        _ => 1,
    })
}

//=============================================
//            Section 3: Node Mapping
//=============================================

pub fn node_to_json(node: &Node) -> JsonValue {
    ensure_sufficient_stack(|| node_to_json_inner(node))
}

fn node_to_json_inner(node: &Node) -> JsonValue {
    match node {
        Node::Number(text) => json!(["number", text]),
        Node::String(text) => json!(["string", text]),
        Node::None => json!(["none"]),
        Node::Symbol(name) => json!(["symbol", name]),
        Node::Operation { op, left, right } => json!([
            "operation",
            op.to_string(),
            node_to_json(left),
            node_to_json(right)
        ]),
        Node::Call { callee, args } => json!([
            "call",
            node_to_json(callee),
            args.iter().map(node_to_json).collect::<Vec<_>>()
        ]),
        Node::Function { params, body } => json!([
            "function",
            params
                .iter()
                .map(|name| json!(["symbol", name]))
                .collect::<Vec<_>>(),
            body.iter().map(node_to_json).collect::<Vec<_>>()
        ]),
        Node::Assignment { target, value } => {
            json!(["assignment", ["symbol", target], node_to_json(value)])
        }
    }
}

pub fn node_from_json(value: &JsonValue) -> Result<Node, CodecError> {
    ensure_sufficient_stack(|| node_from_json_inner(value))
}

fn node_from_json_inner(value: &JsonValue) -> Result<Node, CodecError> {
    let items = value
        .as_array()
        .ok_or_else(|| malformed("expected a tagged array", value))?;
    let Some((tag, fields)) = items.split_first() else {
        return Err(malformed("empty node", value));
    };
    let tag = tag
        .as_str()
        .ok_or_else(|| malformed("node tag must be a string", value))?;

    let node = match (tag, fields) {
        ("number", [text]) => Node::Number(text_field(text)?),
        ("string", [text]) => Node::String(text_field(text)?),
        ("none", []) => Node::None,
        ("symbol", [name]) => Node::Symbol(text_field(name)?),
        ("operation", [op, left, right]) => {
            let op_text = text_field(op)?;
            let mut chars = op_text.chars();
            let (Some(symbol), None) = (chars.next(), chars.next()) else {
                return Err(malformed("operator must be a single character", op));
            };
            Node::operation(symbol, node_from_json(left)?, node_from_json(right)?)
        }
        ("call", [callee, args]) => Node::call(node_from_json(callee)?, node_list(args)?),
        ("function", [params, body]) => {
            let names = node_list(params)?
                .into_iter()
                .map(|param| match param {
                    Node::Symbol(name) => Ok(name),
                    other => Err(CodecError::Malformed(format!(
                        "function parameter must be a symbol, found {}",
                        other.tag()
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Node::function(names, node_list(body)?)
        }
        ("assignment", [target, value]) => match node_from_json(target)? {
            Node::Symbol(name) => Node::assignment(name, node_from_json(value)?),
            other => {
                return Err(CodecError::Malformed(format!(
                    "assignment target must be a symbol, found {}",
                    other.tag()
                )));
            }
        },
        _ => {
            return Err(CodecError::Malformed(format!(
                "unknown node '{tag}' with {} field(s)",
                fields.len()
            )));
        }
    };
    Ok(node)
}

fn node_list(value: &JsonValue) -> Result<Vec<Node>, CodecError> {
    value
        .as_array()
        .ok_or_else(|| malformed("expected a list of nodes", value))?
        .iter()
        .map(node_from_json)
        .collect()
}

fn text_field(value: &JsonValue) -> Result<String, CodecError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| malformed("expected a string payload", value))
}

fn malformed(reason: &str, value: &JsonValue) -> CodecError {
    let mut shown = value.to_string();
    if shown.len() > 60 {
        let cut = (0..=60).rev().find(|i| shown.is_char_boundary(*i)).unwrap_or(0);
        shown.truncate(cut);
        shown.push_str("...");
    }
    CodecError::Malformed(format!("{reason}: {shown}"))
}

//=============================================
//            Section 4: Tests
//=============================================
