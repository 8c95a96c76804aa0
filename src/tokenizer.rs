//=============================================
// objgscript/tokenizer.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: ObjgScript lexical analysis
// Objective: Turn raw source text into a lazy stream of position-tagged tokens
//=============================================

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

//=============================================
//            Section 1: Positions & Tokens
//=============================================

/// Represents the position of a token in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Token kinds produced by the tokenizer. Structural kinds are named after the
/// single character they stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Operation,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
    Equal,
    At,
    String,
    Number,
    Symbol,
}

impl TokenKind {
    fn structural(c: char) -> Option<Self> {
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '=' => TokenKind::Equal,
            '@' => TokenKind::At,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Operation => "operation",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Equal => "=",
            TokenKind::At => "@",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Symbol => "symbol",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Operation | TokenKind::String | TokenKind::Number | TokenKind::Symbol => {
                f.write_str(self.as_str())
            }
            _ => write!(f, "'{}'", self.as_str()),
        }
    }
}

/// A token with its text payload. Structural tokens carry an empty text.
/// `end` is the position just past the token's last character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
    pub end: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
            end: position,
        }
    }

    fn ending_at(mut self, end: Position) -> Self {
        self.end = end;
        self
    }
}

//=============================================
//            Section 2: Lexical Errors
//=============================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Unterminated string literal starting at {position}")]
    UnterminatedString { position: Position },
    #[error("Unknown character '{character}' at {position}")]
    UnknownCharacter { character: char, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnterminatedString { position }
            | LexError::UnknownCharacter { position, .. } => *position,
        }
    }
}

//=============================================
//            Section 3: Tokenizer
//=============================================

/// Lazy tokenizer. Yields tokens one at a time and stops for good after the
/// first lexical error.
pub struct Tokenizer<'src> {
    chars: Peekable<Chars<'src>>,
    line: usize,
    column: usize,
    offset: usize,
    failed: bool,
}

impl<'src> Tokenizer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            offset: 0,
            failed: false,
        }
    }

    /// Drain the whole input into a vector of tokens.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column, self.offset)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.offset += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_comment(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn scan_string(&mut self, delimiter: char, start: Position) -> Result<Token, LexError> {
        let mut text = String::new();
        loop {
            match self.advance() {
                Some(c) if c == delimiter => {
                    let end = self.current_position();
                    return Ok(Token::new(TokenKind::String, text, start).ending_at(end));
                }
                Some(c) => text.push(c),
                None => return Err(LexError::UnterminatedString { position: start }),
            }
        }
    }

    fn scan_while(&mut self, first: char, allowed: fn(char) -> bool) -> String {
        let mut text = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if !allowed(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
        text
    }

    fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        loop {
            let start = self.current_position();
            let c = self.advance()?;
            let token = match c {
                ' ' | '\n' => continue,
                '#' => {
                    self.skip_comment();
                    continue;
                }
                '+' | '-' | '*' | '/' => Token::new(TokenKind::Operation, c, start),
                '\'' | '"' => return Some(self.scan_string(c, start)),
                c if c.is_ascii_digit() || c == '.' => {
                    let text = self.scan_while(c, is_number_char);
                    Token::new(TokenKind::Number, text, start)
                }
                c if is_symbol_char(c) => {
                    let text = self.scan_while(c, is_symbol_char);
                    Token::new(TokenKind::Symbol, text, start)
                }
                c => match TokenKind::structural(c) {
                    Some(kind) => Token::new(kind, "", start),
                    None => {
                        return Some(Err(LexError::UnknownCharacter {
                            character: c,
                            position: start,
                        }));
                    }
                },
            };
            return Some(Ok(token.ending_at(self.current_position())));
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_token();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

//=============================================
//            Section 4: Tests
//=============================================
