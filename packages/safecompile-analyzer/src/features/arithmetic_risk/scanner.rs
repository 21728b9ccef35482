//! Integer-overflow risk scanner
//!
//! Flags arithmetic that has no visible bounds check nearby. This is a
//! best-effort text heuristic: it neither resolves scopes nor follows data
//! flow, and a comparison anywhere in the window counts as a check.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::taint::collect_tainted;
use crate::shared::models::{source_tags, Finding, Severity};
use crate::shared::utils::line_window;

/// CWE for integer overflow or wraparound
pub const INTEGER_OVERFLOW_CWE: &str = "CWE-190";

/// Default number of lines inspected on each side of a match
pub const DEFAULT_CONTEXT_RADIUS: usize = 2;

const OVERFLOW_SUGGESTION: &str = "Validate inputs and add bounds checking before the operation. \
     Example: if (a > INT_MAX - b) { /* handle overflow */ }.";

/// Shape of the risky operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// `a = b + c;`
    Arithmetic,
    /// `a += b;`
    CompoundArithmetic,
    /// `buf[i + 1]`
    ArrayIndexing,
    /// `malloc(n * size)`
    AllocationSize,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Arithmetic => "Arithmetic",
            OperationKind::CompoundArithmetic => "Compound Arithmetic",
            OperationKind::ArrayIndexing => "Array Indexing Arithmetic",
            OperationKind::AllocationSize => "Allocation Size Arithmetic",
        }
    }

    pub fn title(&self) -> String {
        format!("Integer Overflow Risk in {}", self.as_str())
    }
}

lazy_static! {
    /// Risky operations in the order they are reported within a line
    static ref OPERATIONS: Vec<(OperationKind, Regex)> = [
        (OperationKind::Arithmetic, r"(\w+)\s*=\s*(\w+)\s*[-+*/]\s*(\w+)\s*;"),
        (OperationKind::CompoundArithmetic, r"(\w+)\s*[-+*/]=\s*(\w+)\s*;"),
        (OperationKind::ArrayIndexing, r"\w+\[\s*([^\]]+)\s*\]"),
        (OperationKind::AllocationSize, r"\b(?:malloc|calloc|realloc)\s*\(\s*([^)]+)\)"),
    ]
    .iter()
    .map(|(kind, pattern)| (*kind, Regex::new(pattern).expect("operation pattern must compile")))
    .collect();

    static ref BOUNDS_CHECK: Regex =
        Regex::new(r"(?i)(if\s*\(.*[<>]=?)|(INT_MAX)|(INT_MIN)").expect("bounds check pattern must compile");

    static ref WORD: Regex = Regex::new(r"\w+").expect("word pattern must compile");
}

/// Arithmetic-risk detector over raw source text
#[derive(Debug, Clone)]
pub struct ArithmeticRiskScanner {
    context_radius: usize,
}

impl ArithmeticRiskScanner {
    pub fn new() -> Self {
        Self {
            context_radius: DEFAULT_CONTEXT_RADIUS,
        }
    }

    pub fn with_context_radius(mut self, radius: usize) -> Self {
        self.context_radius = radius;
        self
    }

    pub fn context_radius(&self) -> usize {
        self.context_radius
    }

    /// Scan `source`; findings come out in line order
    pub fn scan(&self, source: &str) -> Vec<Finding> {
        let lines: Vec<&str> = source.lines().collect();
        let tainted = collect_tainted(&lines);
        let mut findings = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            for (kind, regex) in OPERATIONS.iter() {
                for caps in regex.captures_iter(line) {
                    let uses_input = caps
                        .iter()
                        .skip(1)
                        .flatten()
                        .flat_map(|group| WORD.find_iter(group.as_str()))
                        .any(|word| tainted.contains(word.as_str()));

                    if self.has_bounds_check(&lines, index) {
                        continue;
                    }

                    findings.push(self.finding(*kind, index + 1, uses_input));
                }
            }
        }

        debug!(
            tainted = tainted.len(),
            findings = findings.len(),
            "arithmetic scan finished"
        );
        findings
    }

    fn has_bounds_check(&self, lines: &[&str], index: usize) -> bool {
        lines[line_window(index, self.context_radius, lines.len())]
            .iter()
            .any(|line| BOUNDS_CHECK.is_match(line))
    }

    fn finding(&self, kind: OperationKind, line: usize, uses_input: bool) -> Finding {
        let (severity, explanation) = if uses_input {
            (
                Severity::High,
                "Arithmetic operation without explicit bounds checking detected. It involves \
                 user-controlled data, increasing risk. This is a best-effort text heuristic \
                 without data-flow analysis.",
            )
        } else {
            (
                Severity::Medium,
                "Arithmetic operation without explicit bounds checking detected. This is a \
                 best-effort text heuristic without data-flow analysis.",
            )
        };

        Finding::new(
            kind.title(),
            u32::try_from(line).unwrap_or(u32::MAX),
            severity,
            source_tags::ARITHMETIC,
        )
        .with_explanation(explanation)
        .with_suggestion(OVERFLOW_SUGGESTION)
        .with_cwe(INTEGER_OVERFLOW_CWE)
    }
}

impl Default for ArithmeticRiskScanner {
    fn default() -> Self {
        Self::new()
    }
}
