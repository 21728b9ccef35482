//! Lexical token types
//!
//! Tokens are produced once by the scanner and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token classification, in scanner priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Keyword,
    Identifier,
    Number,
    Char,
    String,
    Operator,
    Separator,
    Preprocessor,
    Comment,
    Unknown,
    /// Trivia: only visible through the lossless scan
    Whitespace,
}

impl TokenKind {
    /// Name used for terminal parse tree nodes
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::Char => "CHAR",
            TokenKind::String => "STRING",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Separator => "SEPARATOR",
            TokenKind::Preprocessor => "PREPROCESSOR",
            TokenKind::Comment => "COMMENT",
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::Whitespace => "WHITESPACE",
        }
    }

    /// Whitespace and comments are consumed but never reach the parser
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified lexeme with the 1-based line it starts on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    /// True if this token has the given kind and lexeme
    pub fn is(&self, kind: TokenKind, lexeme: &str) -> bool {
        self.kind == kind && self.lexeme == lexeme
    }

    pub fn is_separator(&self, lexeme: &str) -> bool {
        self.is(TokenKind::Separator, lexeme)
    }

    pub fn is_keyword(&self, lexeme: &str) -> bool {
        self.is(TokenKind::Keyword, lexeme)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}) at line {}", self.kind, self.lexeme, self.line)
    }
}
