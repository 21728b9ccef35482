//! Parsing domain: tree, diagnostics and the insecure function table

pub mod diagnostics;
pub mod insecure_functions;
pub mod parse_tree;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use insecure_functions::{
    InsecureCall, InsecureFunctionInfo, InsecureFunctionTable, INSECURE_FUNCTIONS, UNKNOWN_CWE,
};
pub use parse_tree::{ParseTreeNode, PreOrder};
