//! Line-regex detector for well-known unsafe calls
//!
//! A fallback for code the parser cannot reach (macros, malformed functions).
//! Titles match the parser's so the aggregator collapses the duplicates.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::shared::models::{source_tags, Finding, Severity};

const PATTERN_EXPLANATION: &str =
    "This function is known to be insecure and can lead to vulnerabilities.";

/// One line pattern and the finding it produces
#[derive(Debug)]
pub struct CallPattern {
    pub title: &'static str,
    pub severity: Severity,
    pub cwe_id: &'static str,
    pub suggestion: &'static str,
    regex: Regex,
}

impl CallPattern {
    fn new(
        pattern: &str,
        title: &'static str,
        severity: Severity,
        cwe_id: &'static str,
        suggestion: &'static str,
    ) -> Self {
        Self {
            title,
            severity,
            cwe_id,
            suggestion,
            regex: Regex::new(pattern).expect("call pattern must compile"),
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

lazy_static! {
    /// Built-in call patterns, reported in this order per line
    pub static ref CALL_PATTERNS: Vec<CallPattern> = vec![
        CallPattern::new(
            r"\bgets\s*\(",
            "Unsafe gets() Usage",
            Severity::Critical,
            "CWE-120",
            "use fgets() with an explicit buffer size",
        ),
        CallPattern::new(
            r"\bstrcpy\s*\(",
            "Unsafe strcpy() Usage",
            Severity::High,
            "CWE-120",
            "use strncpy() with size limit",
        ),
        CallPattern::new(
            r"\bsprintf\s*\(",
            "Unsafe sprintf() Usage",
            Severity::High,
            "CWE-120",
            "use snprintf()",
        ),
        CallPattern::new(
            r"\bprintf\s*\(\s*[a-zA-Z_][a-zA-Z0-9_]*\s*\)",
            "Format String Vulnerability",
            Severity::Medium,
            "CWE-134",
            "pass user data as an argument: printf(\"%s\", value)",
        ),
    ];
}

/// Scan `source` line by line; at most one finding per line per pattern
pub fn detect_patterns(source: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let line_number = u32::try_from(index + 1).unwrap_or(u32::MAX);
        for pattern in CALL_PATTERNS.iter().filter(|p| p.is_match(line)) {
            findings.push(
                Finding::new(pattern.title, line_number, pattern.severity, source_tags::PATTERN)
                    .with_explanation(PATTERN_EXPLANATION)
                    .with_suggestion(pattern.suggestion)
                    .with_cwe(pattern.cwe_id),
            );
        }
    }

    debug!(findings = findings.len(), "pattern scan finished");
    findings
}
