//=============================================
// objgscript/parser.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: ObjgScript recursive descent parser implementation
// Objective: Transform token streams into AST nodes consumed by the interpreter
//=============================================

//=============================================
//            Section 1: Imports
//=============================================

use thiserror::Error;

use crate::ast::{Node, Program};
use crate::stack::ensure_sufficient_stack;
use crate::tokenizer::{LexError, Position, Token, TokenKind, Tokenizer};

//=============================================
//            Section 2: Parse Errors
//=============================================

/// Parser error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("Unexpected token {found} at {position}")]
    UnexpectedToken { found: TokenKind, position: Position },
    #[error("Unexpected end of input, expected {expected} after {position}")]
    UnexpectedEndOfInput { expected: String, position: Position },
    #[error("Can only assign to a symbol (at {position})")]
    InvalidAssignmentTarget { position: Position },
    #[error("Parameter lists may only contain symbols, found {found} at {position}")]
    InvalidParameter {
        found: &'static str,
        position: Position,
    },
    #[error("Expected {expected} at {position}")]
    MissingOperand { expected: String, position: Position },
    #[error("Expression nesting too deep at {position}")]
    NestingTooDeep { position: Position },
}

//=============================================
//            Section 3: Parser State
//=============================================

/// Deepest expression nesting the parser accepts.
pub const MAX_EXPRESSION_DEPTH: usize = 2048;

const STATEMENT_STOP: [TokenKind; 1] = [TokenKind::Semicolon];

/// Recursive descent parser for ObjgScript.
///
/// The parser pulls tokens lazily with a single token of lookahead and yields
/// top-level statements one at a time. Every expression is parsed against a
/// stop set: the token kinds that end the expression without being consumed.
pub struct Parser<I>
where
    I: Iterator<Item = Result<Token, LexError>>,
{
    tokens: I,
    lookahead: Option<Token>,
    last_position: Position,
    last_end: Position,
    expr_depth: usize,
    failed: bool,
}

impl<'src> Parser<Tokenizer<'src>> {
    pub fn from_source(source: &'src str) -> Self {
        Parser::new(Tokenizer::new(source))
    }
}

impl<I> Parser<I>
where
    I: Iterator<Item = Result<Token, LexError>>,
{
    //Function: new
    //Purpose: Initialize parser over a (possibly lazy) token stream
    //Inputs: tokens: token iterator
    //Returns: Self
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            lookahead: None,
            last_position: Position::default(),
            last_end: Position::default(),
            expr_depth: 0,
            failed: false,
        }
    }

    /// Parse every remaining statement into a program.
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        self.collect()
    }

    //=============================================
    //            Section 4: Token Navigation
    //=============================================

    fn peek_kind(&mut self) -> Result<Option<TokenKind>, ParseError> {
        if self.lookahead.is_none() {
            self.lookahead = self.tokens.next().transpose()?;
        }
        Ok(self.lookahead.as_ref().map(|token| token.kind))
    }

    fn advance(&mut self, expected: &str) -> Result<Token, ParseError> {
        self.peek_kind()?;
        match self.lookahead.take() {
            Some(token) => {
                self.last_position = token.position;
                self.last_end = token.end;
                Ok(token)
            }
            None => Err(self.end_of_input(expected)),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.advance(&kind.to_string())?;
        if token.kind != kind {
            return Err(ParseError::UnexpectedToken {
                found: token.kind,
                position: token.position,
            });
        }
        Ok(token)
    }

    fn end_of_input(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedEndOfInput {
            expected: expected.to_string(),
            position: self.last_end,
        }
    }

    //=============================================
    //            Section 5: Statement Parsing
    //=============================================

    fn next_statement(&mut self) -> Result<Option<Node>, ParseError> {
        while self.peek_kind()?.is_some() {
            let statement = self.next_expr(&STATEMENT_STOP)?;
            self.advance(&describe(&STATEMENT_STOP))?;
            if statement.is_some() {
                return Ok(statement);
            }
        }
        Ok(None)
    }

    //=============================================
    //            Section 6: Expression Parsing
    //=============================================

    fn next_expr(&mut self, stop: &[TokenKind]) -> Result<Option<Node>, ParseError> {
        if self.expr_depth >= MAX_EXPRESSION_DEPTH {
            return Err(ParseError::NestingTooDeep {
                position: self.last_position,
            });
        }
        self.expr_depth += 1;
        let result = ensure_sufficient_stack(|| self.expression_tail(stop));
        self.expr_depth -= 1;
        result
    }

    // Operators take the whole remainder of the expression as their right operand,
    // so `1 * 2 + 3` groups as `1 * (2 + 3)`.
    fn expression_tail(&mut self, stop: &[TokenKind]) -> Result<Option<Node>, ParseError> {
        let mut prev: Option<Node> = None;
        // Chained calls nest the callee without recursing here.
        let mut chained_calls = 0;
        loop {
            let Some(kind) = self.peek_kind()? else {
                return Err(self.end_of_input(&describe(stop)));
            };
            if stop.contains(&kind) {
                return Ok(prev);
            }
            let token = self.advance(&describe(stop))?;
            let position = token.position;

            let node = match (token.kind, prev.take()) {
                (TokenKind::Number, None) => Node::Number(token.text),
                (TokenKind::String, None) => Node::String(token.text),
                (TokenKind::Symbol, None) => Node::Symbol(token.text),
                (TokenKind::Operation, Some(left)) => {
                    let Some(op) = token.text.chars().next() else {
                        return Err(ParseError::UnexpectedToken {
                            found: token.kind,
                            position,
                        });
                    };
                    let right = self.operand(stop, format!("right operand for '{op}'"), position)?;
                    Node::operation(op, left, right)
                }
                (TokenKind::Operation, None) => {
                    return Err(ParseError::MissingOperand {
                        expected: format!("left operand for '{}'", token.text),
                        position,
                    });
                }
                (TokenKind::LeftParen, Some(callee)) => {
                    chained_calls += 1;
                    if self.expr_depth + chained_calls > MAX_EXPRESSION_DEPTH {
                        return Err(ParseError::NestingTooDeep { position });
                    }
                    let args = self.delimited(TokenKind::Comma, TokenKind::RightParen)?;
                    Node::call(callee, args)
                }
                (TokenKind::LeftParen, None) => {
                    return Err(ParseError::MissingOperand {
                        expected: "callee before '('".to_string(),
                        position,
                    });
                }
                (TokenKind::LeftBrace, None) => self.function_literal()?,
                (TokenKind::Equal, Some(Node::Symbol(target))) => {
                    let value = self.operand(stop, "value to assign".to_string(), position)?;
                    Node::assignment(target, value)
                }
                (TokenKind::Equal, _) => {
                    return Err(ParseError::InvalidAssignmentTarget { position });
                }
                (found, _) => return Err(ParseError::UnexpectedToken { found, position }),
            };
            prev = Some(node);
        }
    }

    fn operand(
        &mut self,
        stop: &[TokenKind],
        expected: String,
        position: Position,
    ) -> Result<Node, ParseError> {
        self.next_expr(stop)?
            .ok_or(ParseError::MissingOperand { expected, position })
    }

    /// Parse `item sep item sep ... end`, consuming the closing token. Empty items
    /// are skipped.
    fn delimited(&mut self, sep: TokenKind, end: TokenKind) -> Result<Vec<Node>, ParseError> {
        let mut items = Vec::new();
        if self.peek_kind()? == Some(end) {
            self.advance(&end.to_string())?;
            return Ok(items);
        }

        let stop = [sep, end];
        loop {
            if let Some(item) = self.next_expr(&stop)? {
                items.push(item);
            }
            let token = self.advance(&describe(&stop))?;
            if token.kind == end {
                return Ok(items);
            }
        }
    }

    fn function_literal(&mut self) -> Result<Node, ParseError> {
        let mut params = Vec::new();
        if self.peek_kind()? == Some(TokenKind::At) {
            let at = self.advance("'@'")?;
            self.expect(TokenKind::LeftParen)?;
            for param in self.delimited(TokenKind::Comma, TokenKind::RightParen)? {
                match param {
                    Node::Symbol(name) => params.push(name),
                    other => {
                        return Err(ParseError::InvalidParameter {
                            found: other.tag(),
                            position: at.position,
                        });
                    }
                }
            }
        }
        let body = self.delimited(TokenKind::Semicolon, TokenKind::RightBrace)?;
        Ok(Node::function(params, body))
    }
}

impl<I> Iterator for Parser<I>
where
    I: Iterator<Item = Result<Token, LexError>>,
{
    type Item = Result<Node, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_statement().transpose();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}

fn describe(kinds: &[TokenKind]) -> String {
    kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" or ")
}

//=============================================
//            Section 7: Tests
//=============================================
