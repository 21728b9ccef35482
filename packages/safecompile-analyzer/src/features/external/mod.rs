//! External findings ingestion
//!
//! Accepts the JSON that outside detectors (LLM reviewers, other scanners)
//! emit and converts it into [`Finding`]s. Input is often sloppy: fenced in
//! markdown, wrapped in an object, or mixed with prose. Parsing is lenient
//! about all of that and only fails when no JSON can be recovered.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{AnalyzerError, Result};
use crate::shared::models::{Finding, Severity};

/// Tag applied when a caller has no better name for the source
pub const DEFAULT_EXTERNAL_TAG: &str = "external";

lazy_static! {
    static ref JSON_ARRAY: Regex = Regex::new(r"(?s)\[.*\]").expect("array pattern must compile");
}

/// Drop a surrounding markdown code fence, with or without a `json` tag
fn strip_code_fence(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest.trim_start();
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}

/// Parse the outermost `[...]` span if there is one, else the whole text
fn parse_json(text: &str) -> Result<Value> {
    if let Some(array) = JSON_ARRAY.find(text) {
        if let Ok(value) = serde_json::from_str(array.as_str()) {
            return Ok(value);
        }
    }
    Ok(serde_json::from_str(text)?)
}

/// The list of entries: the value itself, or the first list (in document
/// order) inside an object
fn entries(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(map) => map
            .into_iter()
            .find_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn line_number(entry: &Value) -> Option<u32> {
    let raw = entry.get("line_number")?;
    let line = match raw {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u32::try_from(line).ok().filter(|line| *line >= 1)
}

fn string_field(entry: &Value, key: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn to_finding(entry: &Value, source_tag: &str) -> Option<Finding> {
    if !entry.is_object() {
        return None;
    }
    let line = line_number(entry)?;
    let severity = Severity::from_str_lenient(&string_field(entry, "severity"));

    let mut finding = Finding::new(string_field(entry, "title"), line, severity, source_tag)
        .with_explanation(string_field(entry, "explanation"))
        .with_suggestion(string_field(entry, "suggestion"));

    let cwe = entry
        .get("cwe_id")
        .or_else(|| entry.get("cwe"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|cwe| !cwe.is_empty());
    if let Some(cwe) = cwe {
        finding = finding.with_cwe(cwe);
    }
    Some(finding)
}

/// Convert external detector output into findings tagged with `source_tag`.
///
/// Entries without a usable `line_number` (missing, non-numeric, below 1)
/// are dropped. Valid JSON that holds no list yields an empty result.
pub fn parse_external_findings(text: &str, source_tag: &str) -> Result<Vec<Finding>> {
    let text = strip_code_fence(text);
    if text.is_empty() {
        return Err(AnalyzerError::external("empty response"));
    }

    let value = parse_json(text)?;
    if !value.is_array() && !value.is_object() {
        warn!(source = source_tag, "external findings are valid JSON but not a list");
    }

    let raw = entries(value);
    let total = raw.len();
    let findings: Vec<Finding> = raw.iter().filter_map(|e| to_finding(e, source_tag)).collect();

    debug!(
        source = source_tag,
        accepted = findings.len(),
        dropped = total - findings.len(),
        "external findings parsed"
    );
    Ok(findings)
}

/// Read and parse a findings file; the file stem becomes the source tag
pub fn load_external_findings(path: &Path) -> Result<Vec<Finding>> {
    let text = std::fs::read_to_string(path)?;
    let tag = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(DEFAULT_EXTERNAL_TAG);
    parse_external_findings(&text, tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_array() {
        let text = r#"[{"title": "Buffer Overflow", "line_number": 4, "severity": "high",
                        "explanation": "x", "suggestion": "use fgets", "cwe_id": "CWE-120"}]"#;
        let findings = parse_external_findings(text, "llm").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].source_tag, "llm");
        assert_eq!(findings[0].cwe_id.as_deref(), Some("CWE-120"));
    }

    #[test]
    fn test_fenced_and_wrapped() {
        let text = "```json\n{\"vulnerabilities\": [{\"title\": \"A\", \"line_number\": 2}]}\n```";
        let findings = parse_external_findings(text, "llm").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line_number, 2);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert!(findings[0].suggestion.is_empty());
    }

    #[test]
    fn test_wrapped_object_uses_first_list_in_document_order() {
        let text = r#"{"results": [{"title": "A", "line_number": 2}], "errors": [], "notes": ["x"]}"#;
        let findings = parse_external_findings(text, "llm").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].title, "A");
    }

    #[test]
    fn test_prose_around_array() {
        let text = "Here is what I found:\n[{\"title\": \"B\", \"line_number\": \"7\"}]\nThanks.";
        let findings = parse_external_findings(text, "llm").unwrap();
        assert_eq!(findings[0].line_number, 7);
    }

    #[test]
    fn test_invalid_lines_are_dropped() {
        let text = r#"[{"title": "no line"}, {"title": "zero", "line_number": 0},
                       {"title": "neg", "line_number": -3}, "junk", {"title": "ok", "line_number": 1}]"#;
        let findings = parse_external_findings(text, "llm").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].title, "ok");
    }

    #[test]
    fn test_scalar_json_is_empty() {
        assert!(parse_external_findings("42", "llm").unwrap().is_empty());
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(parse_external_findings("not json at all", "llm").is_err());
        assert!(matches!(
            parse_external_findings("   ", "llm"),
            Err(AnalyzerError::ExternalFindings(_))
        ));
    }
}
