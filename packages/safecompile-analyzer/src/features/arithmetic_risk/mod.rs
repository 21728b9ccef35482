//! Arithmetic-risk heuristic
//!
//! Text-level detection of integer-overflow-prone operations, independent of
//! the parser. Findings are advisory.

pub mod scanner;
pub mod taint;

pub use scanner::{ArithmeticRiskScanner, OperationKind, DEFAULT_CONTEXT_RADIUS, INTEGER_OVERFLOW_CWE};
pub use taint::{collect_tainted, TaintSource, TAINT_SOURCES};
