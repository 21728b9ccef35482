//! Finding types shared by every detector
//!
//! Parser, heuristic, pattern and external detectors all emit this one shape,
//! so the aggregator can merge them without per-source adapters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity levels for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Critical: Immediate security risk
    Critical,
    /// High: Significant security risk
    High,
    /// Medium: Moderate security risk
    Medium,
    /// Low: Minor security risk
    Low,
}

impl Severity {
    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    /// Parse a severity label case-insensitively
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            "medium" | "moderate" => Some(Severity::Medium),
            "low" | "info" => Some(Severity::Low),
            _ => None,
        }
    }

    /// Parse a severity label, falling back to `Medium` for anything unrecognized
    pub fn from_str_lenient(s: &str) -> Self {
        Self::from_str(s).unwrap_or(Severity::Medium)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detector tags used by the built-in detectors
pub mod source_tags {
    pub const PARSER: &str = "parser";
    pub const ARITHMETIC: &str = "arithmetic";
    pub const PATTERN: &str = "pattern";
}

/// A single security finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Short title, compared case-insensitively during dedup
    pub title: String,

    /// 1-based line in the analyzed source
    pub line_number: u32,

    pub severity: Severity,

    #[serde(default)]
    pub explanation: String,

    /// Suggested fix; an empty suggestion loses to a non-empty one on merge
    #[serde(default)]
    pub suggestion: String,

    /// Which detector produced the finding
    #[serde(default)]
    pub source_tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwe_id: Option<String>,
}

impl Finding {
    /// Create a finding with empty explanation and suggestion
    pub fn new(
        title: impl Into<String>,
        line_number: u32,
        severity: Severity,
        source_tag: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            line_number,
            severity,
            explanation: String::new(),
            suggestion: String::new(),
            source_tag: source_tag.into(),
            cwe_id: None,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }

    pub fn with_cwe(mut self, cwe_id: impl Into<String>) -> Self {
        self.cwe_id = Some(cwe_id.into());
        self
    }

    /// True if a non-blank suggestion is attached
    pub fn has_suggestion(&self) -> bool {
        !self.suggestion.trim().is_empty()
    }

    /// Aggregation key: `(line, lowercase title)`
    pub fn dedup_key(&self) -> (u32, String) {
        (self.line_number, self.title.to_lowercase())
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] line {}: {}",
            self.severity, self.line_number, self.title
        )?;
        if let Some(cwe) = &self.cwe_id {
            write!(f, " ({})", cwe)?;
        }
        Ok(())
    }
}
