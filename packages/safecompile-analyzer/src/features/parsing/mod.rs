//! Parsing feature
//!
//! Builds the concrete parse tree and reports insecure calls while it goes.
//!
//! ```text
//! &str ─▶ tokenize ─▶ Parser ─▶ ParseOutcome { warnings, insecure_findings, parse_tree }
//! ```

pub mod domain;
pub mod infrastructure;

pub use domain::{
    Diagnostic, DiagnosticKind, InsecureCall, InsecureFunctionInfo, InsecureFunctionTable,
    ParseTreeNode, INSECURE_FUNCTIONS,
};
pub use infrastructure::{analyze_source, to_dot, ParseOutcome, Parser, MAX_NESTING_DEPTH};
