//! Parser diagnostics
//!
//! Syntax problems are recovered locally and recorded here; they never abort
//! the analysis.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A required token was not found
    MissingToken,
    /// `{` without its matching `}`
    UnclosedBlock,
    /// `(` of a parameter list without its matching `)`
    UnclosedParameters,
    /// `(` / `[` inside an expression or condition left open
    UnclosedGroup,
    /// Top-level token that cannot start a function definition
    InvalidTopLevel,
    /// Token dropped to guarantee progress
    SkippedToken,
    SkippedPreprocessor,
    /// Input nested deeper than the parser descends
    NestingLimit,
}

/// A located parser warning.
///
/// `line` is `None` only when the token list is empty and there is nothing to
/// point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: Option<u32>,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: Option<u32>, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }
}

/// Renders as `"<line>: <message>"`, or `"EOF: <message>"` without a line
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}: {}", line, self.message),
            None => write!(f, "EOF: {}", self.message),
        }
    }
}
