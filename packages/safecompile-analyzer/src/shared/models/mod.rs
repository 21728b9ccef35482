//! Shared models

mod finding;
mod token;

pub use finding::{source_tags, Finding, Severity};
pub use token::{Token, TokenKind};
