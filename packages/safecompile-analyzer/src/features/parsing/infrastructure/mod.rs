//! Parser and tree exporters

pub mod dot_export;
pub mod parser;

pub use dot_export::to_dot;
pub use parser::{analyze_source, ParseOutcome, Parser, MAX_NESTING_DEPTH};
