//! Lexing Feature
//!
//! Turns C source text into an ordered token sequence with 1-based line numbers.
//! The scanner is total: it accepts any string and always terminates.

pub mod tokenizer;

pub use tokenizer::{scan, tokenize, Tokenizer, KEYWORDS};
