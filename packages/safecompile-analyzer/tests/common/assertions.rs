//! Custom assertions for finding and parse verification

use safecompile_analyzer::features::parsing::{ParseOutcome, ParseTreeNode};
use safecompile_analyzer::shared::models::{Finding, Severity};

/// Assert the parse recovered nothing
pub fn assert_no_warnings(outcome: &ParseOutcome) {
    assert!(
        outcome.warnings.is_empty(),
        "Expected no warnings, got: {:?}",
        outcome.warning_lines()
    );
}

/// Assert some warning mentions `needle`
pub fn assert_warning_contains(outcome: &ParseOutcome, needle: &str) {
    let lines = outcome.warning_lines();
    assert!(
        lines.iter().any(|w| w.contains(needle)),
        "Expected a warning containing '{needle}', got: {lines:?}"
    );
}

/// Return the finding with `title` on `line`, failing with context otherwise
pub fn find_finding<'a>(findings: &'a [Finding], title: &str, line: u32) -> &'a Finding {
    findings
        .iter()
        .find(|f| f.title == title && f.line_number == line)
        .unwrap_or_else(|| {
            panic!(
                "Expected '{title}' on line {line}, found: {:?}",
                findings
                    .iter()
                    .map(|f| (f.line_number, f.title.as_str()))
                    .collect::<Vec<_>>()
            )
        })
}

/// Assert a finding exists with the given severity
pub fn assert_finding(findings: &[Finding], title: &str, line: u32, severity: Severity) {
    let finding = find_finding(findings, title, line);
    assert_eq!(
        finding.severity, severity,
        "Wrong severity for '{title}' on line {line}"
    );
}

/// Assert nothing was reported on `line`
pub fn assert_line_clean(findings: &[Finding], line: u32) {
    let on_line: Vec<_> = findings.iter().filter(|f| f.line_number == line).collect();
    assert!(on_line.is_empty(), "Expected no findings on line {line}, got: {on_line:?}");
}

/// Assert no two findings share a dedup key
pub fn assert_unique_keys(findings: &[Finding]) {
    let mut keys: Vec<_> = findings.iter().map(Finding::dedup_key).collect();
    let total = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), total, "Duplicate (line, title) keys in {findings:?}");
}

/// Names of the constructs wrapped by each `Statement` of a body
pub fn statement_kinds(body: &ParseTreeNode) -> Vec<String> {
    body.children_named("Statement")
        .filter_map(|s| s.children.first())
        .map(|c| c.name.clone())
        .collect()
}
