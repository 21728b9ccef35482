//! C Tokenizer
//!
//! # Scanning Strategy
//!
//! At every position the rules below are tried in priority order and the
//! first one that matches wins:
//!
//! 1. Whitespace
//! 2. Comment (`// ...`, `/* ... */`; an unterminated block comment runs to EOF)
//! 3. Preprocessor (`#` to end of line, honoring `\` continuations)
//! 4. Keyword (word-bounded, so `integer` stays an identifier)
//! 5. Identifier
//! 6. Number (decimal, hex, float, with `uUlLfF` suffixes)
//! 7. Character literal (closed on the same line)
//! 8. String literal (closed on the same line)
//! 9. Operator (longest first)
//! 10. Separator
//!
//! Anything else becomes a one-character `Unknown` token, so the scanner
//! always advances and terminates on arbitrary input. An unterminated `"`
//! falls through every rule and lands here.

use lazy_static::lazy_static;
use regex::Regex;

use crate::shared::models::{Token, TokenKind};

/// C keywords recognized by the scanner
pub const KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Bool",
];

lazy_static! {
    /// Scanner rules in priority order. Every pattern is anchored at the cursor.
    static ref RULES: Vec<(TokenKind, Regex)> = {
        let keyword = format!(r"^(?:{})\b", KEYWORDS.join("|"));
        let rules: [(TokenKind, &str); 10] = [
            (TokenKind::Whitespace, r"^\s+"),
            (TokenKind::Comment, r"^(?://[^\n]*|/\*(?s:.*?)\*/|/\*(?s:.*))"),
            (TokenKind::Preprocessor, r"^#(?:\\\r?\n|[^\n])*"),
            (TokenKind::Keyword, keyword.as_str()),
            (TokenKind::Identifier, r"^[A-Za-z_][A-Za-z0-9_]*"),
            (
                TokenKind::Number,
                r"^(?:0[xX][0-9a-fA-F]+|\d+\.\d*(?:[eE][+-]?\d+)?|\.\d+(?:[eE][+-]?\d+)?|\d+(?:[eE][+-]?\d+)?)[uUlLfF]*",
            ),
            (TokenKind::Char, r"^'(?:\\.|[^\\'\n])*'"),
            (TokenKind::String, r#"^"(?:\\.|[^\\"\n])*""#),
            (
                TokenKind::Operator,
                r"^(?:<<=|>>=|->|\+\+|--|<<|>>|<=|>=|==|!=|&&|\|\||\+=|-=|\*=|/=|%=|&=|\|=|\^=|[-+*/%=<>!&|^~?])",
            ),
            (TokenKind::Separator, r"^[()\[\]{};,.:]"),
        ];
        rules
            .iter()
            .map(|(kind, pattern)| (*kind, Regex::new(pattern).expect("scanner rule must compile")))
            .collect()
    };
}

/// Streaming scanner over a source string.
///
/// Yields every lexeme including whitespace and comments; use [`tokenize`]
/// for the parser-facing sequence.
pub struct Tokenizer<'a> {
    source: &'a str,
    offset: usize,
    line: u32,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
        }
    }

    /// Byte offset of the cursor
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Classify the lexeme at the cursor. Never returns a zero length.
    fn classify(rest: &str) -> Option<(TokenKind, usize)> {
        for (kind, regex) in RULES.iter() {
            if let Some(m) = regex.find(rest) {
                if m.end() > 0 {
                    return Some((*kind, m.end()));
                }
            }
        }
        rest.chars()
            .next()
            .map(|ch| (TokenKind::Unknown, ch.len_utf8()))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let rest = &self.source[self.offset..];
        let (kind, len) = Self::classify(rest)?;
        let lexeme = &rest[..len];

        let token = Token::new(kind, lexeme, self.line);
        self.line += lexeme.bytes().filter(|&b| b == b'\n').count() as u32;
        self.offset += len;
        Some(token)
    }
}

/// Lossless scan: every lexeme, trivia included, in source order.
///
/// Concatenating the lexemes reproduces `source` exactly.
pub fn scan(source: &str) -> Vec<Token> {
    Tokenizer::new(source).collect()
}

/// Parser-facing token sequence: whitespace and comments are dropped,
/// preprocessor lines are kept so the parser can report them.
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source)
        .filter(|token| !token.kind.is_trivia())
        .collect()
}
