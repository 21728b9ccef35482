//! Report rendering

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::analyze::SecurityReport;
use crate::errors::Result;
use crate::shared::models::source_tags;

/// Printed whenever heuristic findings are shown
pub const HEURISTIC_DISCLAIMER: &str = "Note: arithmetic findings come from a best-effort text \
     heuristic without data-flow analysis; review them before acting.";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

/// Render `report` in the requested format
pub fn render(report: &SecurityReport, format: ReportFormat, file_name: &str) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report, file_name)),
        ReportFormat::Json => render_json(report),
    }
}

/// Pretty JSON of the full report, parse tree included
pub fn render_json(report: &SecurityReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Human-readable report
pub fn render_text(report: &SecurityReport, file_name: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "SafeCompile report for {}", file_name);
    let counts = report
        .severity_counts()
        .iter()
        .map(|(severity, count)| format!("{}: {}", severity, count))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "Findings: {} ({})", report.findings.len(), counts);
    let _ = writeln!(
        out,
        "Overall: {}",
        if report.overall_safe { "SAFE" } else { "ISSUES FOUND" }
    );

    if !report.findings.is_empty() {
        out.push('\n');
        for finding in &report.findings {
            let _ = writeln!(out, "{} [{}]", finding, finding.source_tag);
            if !finding.explanation.is_empty() {
                let _ = writeln!(out, "    {}", finding.explanation);
            }
            if finding.has_suggestion() {
                let _ = writeln!(out, "    Suggestion: {}", finding.suggestion);
            }
        }
    }

    if !report.warnings.is_empty() {
        let _ = writeln!(out, "\nParser warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            let _ = writeln!(out, "  {}", warning);
        }
    }

    if report.findings_from(source_tags::ARITHMETIC).next().is_some() {
        let _ = writeln!(out, "\n{}", HEURISTIC_DISCLAIMER);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalyzerConfig, Preset};
    use crate::pipeline::run_analysis;

    #[test]
    fn test_text_report() {
        let source = "int main() {\n  gets(b);\n  x += y;\n  return 0\n}";
        let report = run_analysis(source, &AnalyzerConfig::preset(Preset::Balanced), Vec::new());
        let text = render_text(&report, "demo.c");

        assert!(text.starts_with("SafeCompile report for demo.c\n"));
        assert!(text.contains("Overall: ISSUES FOUND"));
        assert!(text.contains("[Critical] line 2: Unsafe gets() Usage (CWE-120) [parser]"));
        assert!(text.contains("Suggestion: use fgets()"));
        assert!(text.contains("Parser warnings (1):"));
        assert!(text.contains("Missing ';' after return statement"));
        assert!(text.contains(HEURISTIC_DISCLAIMER));
    }

    #[test]
    fn test_safe_text_report() {
        let report = run_analysis("int main() { return 0; }", &AnalyzerConfig::default(), Vec::new());
        let text = render_text(&report, "ok.c");
        assert!(text.contains("Findings: 0 (Critical: 0, High: 0, Medium: 0, Low: 0)"));
        assert!(text.contains("Overall: SAFE"));
        assert!(!text.contains("Parser warnings"));
        assert!(!text.contains(HEURISTIC_DISCLAIMER));
    }

    #[test]
    fn test_json_report() {
        let report = run_analysis("int main() { gets(b); }", &AnalyzerConfig::default(), Vec::new());
        let json = render(&report, ReportFormat::Json, "x.c").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["overall_safe"], false);
        assert_eq!(value["findings"][0]["severity"], "Critical");
        assert_eq!(value["parse_tree"]["name"], "Program");
    }
}
