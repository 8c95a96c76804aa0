//=====================================================
// File: ast.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: ObjgScript Abstract Syntax Tree definitions
// Objective: Define the tagged node kinds a parsed ObjgScript program is made of
//=====================================================

use std::rc::Rc;

/// A single AST node. Function parameter and body lists are reference counted so
/// closures created from the same literal share them.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Number literal, kept in its source text form until evaluation.
    Number(String),
    String(String),
    None,
    Symbol(String),
    Operation {
        op: char,
        left: Box<Node>,
        right: Box<Node>,
    },
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    Function {
        params: Rc<[String]>,
        body: Rc<[Node]>,
    },
    /// The target is always a symbol; the parser rejects anything else.
    Assignment {
        target: String,
        value: Box<Node>,
    },
}

impl Node {
    /// Tag used for this node kind in diagnostics and compiled artifacts.
    pub fn tag(&self) -> &'static str {
        match self {
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::None => "none",
            Node::Symbol(_) => "symbol",
            Node::Operation { .. } => "operation",
            Node::Call { .. } => "call",
            Node::Function { .. } => "function",
            Node::Assignment { .. } => "assignment",
        }
    }

    pub fn operation(op: char, left: Node, right: Node) -> Self {
        Node::Operation {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(callee: Node, args: Vec<Node>) -> Self {
        Node::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn function(params: Vec<String>, body: Vec<Node>) -> Self {
        Node::Function {
            params: params.into(),
            body: body.into(),
        }
    }

    pub fn assignment(target: impl Into<String>, value: Node) -> Self {
        Node::Assignment {
            target: target.into(),
            value: Box::new(value),
        }
    }
}

/// A parsed program: the ordered top-level statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Node>,
}

impl Program {
    pub fn new(statements: Vec<Node>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl FromIterator<Node> for Program {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

//=====================================================
// End of file
//=====================================================
