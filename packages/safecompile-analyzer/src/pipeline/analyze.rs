//! End-to-end analysis of one source file
//!
//! ```text
//! source ─┬─▶ parser ──────────────┐
//!         └─▶ arithmetic + patterns ┼─▶ aggregate ─▶ SecurityReport
//!   external lists ────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AnalyzerConfig;
use crate::features::aggregation::FindingAggregator;
use crate::features::arithmetic_risk::ArithmeticRiskScanner;
use crate::features::parsing::{analyze_source, Diagnostic, ParseOutcome, ParseTreeNode};
use crate::features::pattern_matching::detect_patterns;
use crate::shared::models::{Finding, Severity};

/// Combined result of every detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityReport {
    /// Parser diagnostics, in the order they were hit
    pub warnings: Vec<Diagnostic>,
    /// Deduplicated findings from all detectors
    pub findings: Vec<Finding>,
    pub parse_tree: ParseTreeNode,
    /// True when no finding survived aggregation
    pub overall_safe: bool,
}

impl SecurityReport {
    /// Finding count per severity, most severe first
    pub fn severity_counts(&self) -> [(Severity, usize); 4] {
        [Severity::Critical, Severity::High, Severity::Medium, Severity::Low]
            .map(|severity| {
                let count = self.findings.iter().filter(|f| f.severity == severity).count();
                (severity, count)
            })
    }

    /// Findings produced by one detector
    pub fn findings_from<'a>(&'a self, source_tag: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| f.source_tag == source_tag)
    }
}

/// Output of the text detectors that run beside the parser
fn run_text_detectors(source: &str, config: &AnalyzerConfig) -> (Vec<Finding>, Vec<Finding>) {
    let arithmetic = if config.arithmetic_enabled() {
        ArithmeticRiskScanner::new()
            .with_context_radius(config.get_context_radius())
            .scan(source)
    } else {
        Vec::new()
    };
    let patterns = if config.patterns_enabled() {
        detect_patterns(source)
    } else {
        Vec::new()
    };
    (arithmetic, patterns)
}

/// Run every enabled detector on `source` and merge the results.
///
/// Lists are merged in the order parser, arithmetic, patterns, then each
/// external list, so on a tie the built-in finding is kept.
pub fn run_analysis(
    source: &str,
    config: &AnalyzerConfig,
    external: Vec<Vec<Finding>>,
) -> SecurityReport {
    let (outcome, (arithmetic, patterns)): (ParseOutcome, _) = if config.is_parallel() {
        rayon::join(
            || analyze_source(source),
            || run_text_detectors(source, config),
        )
    } else {
        (analyze_source(source), run_text_detectors(source, config))
    };

    info!(
        parser = outcome.insecure_findings.len(),
        arithmetic = arithmetic.len(),
        patterns = patterns.len(),
        external = external.iter().map(Vec::len).sum::<usize>(),
        warnings = outcome.warnings.len(),
        "detectors finished"
    );

    let mut sets = Vec::with_capacity(3 + external.len());
    sets.push(outcome.insecure_findings);
    sets.push(arithmetic);
    sets.push(patterns);
    sets.extend(external);

    let findings = FindingAggregator::merge_sets(sets);
    info!(findings = findings.len(), "aggregation finished");

    SecurityReport {
        warnings: outcome.warnings,
        overall_safe: findings.is_empty(),
        findings,
        parse_tree: outcome.parse_tree,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;

    const VULNERABLE: &str = "#include <stdio.h>\n\
                              int main() {\n\
                              char buf[10];\n\
                              gets(buf);\n\
                              strcpy(buf, \"x\");\n\
                              return 0;\n\
                              }\n";

    #[test]
    fn test_parser_and_pattern_collapse() {
        let config = AnalyzerConfig::preset(Preset::Thorough);
        let report = run_analysis(VULNERABLE, &config, Vec::new());

        let gets: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.title == "Unsafe gets() Usage")
            .collect();
        assert_eq!(gets.len(), 1);
        assert_eq!(gets[0].source_tag, "parser");
        assert_eq!(gets[0].line_number, 4);
        assert!(!report.overall_safe);
    }

    #[test]
    fn test_fast_preset_skips_text_detectors() {
        let config = AnalyzerConfig::preset(Preset::Fast);
        let report = run_analysis("void f() {\n  total += step;\n}", &config, Vec::new());
        assert!(report.findings.is_empty());
        assert!(report.overall_safe);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let parallel = AnalyzerConfig::preset(Preset::Thorough);
        let sequential = AnalyzerConfig::preset(Preset::Thorough).parallel(false);
        let a = run_analysis(VULNERABLE, &parallel, Vec::new());
        let b = run_analysis(VULNERABLE, &sequential, Vec::new());
        assert_eq!(a.findings, b.findings);
        assert_eq!(a.warnings, b.warnings);
        assert_eq!(a.parse_tree, b.parse_tree);
    }

    #[test]
    fn test_external_findings_are_merged() {
        let external = vec![
            Finding::new("unsafe GETS() usage", 4, Severity::High, "llm").with_suggestion("x"),
            Finding::new("Logic Bomb", 6, Severity::Low, "llm"),
        ];
        let config = AnalyzerConfig::preset(Preset::Fast);
        let report = run_analysis(VULNERABLE, &config, vec![external]);

        assert_eq!(report.findings_from("llm").count(), 1);
        assert!(report.findings.iter().any(|f| f.title == "Logic Bomb"));
    }

    #[test]
    fn test_severity_counts() {
        let config = AnalyzerConfig::preset(Preset::Fast);
        let report = run_analysis(VULNERABLE, &config, Vec::new());
        let counts = report.severity_counts();
        assert_eq!(counts[0], (Severity::Critical, 1));
        assert_eq!(counts[1], (Severity::High, 1));
    }

    #[test]
    fn test_empty_source_is_safe() {
        let report = run_analysis("", &AnalyzerConfig::default(), Vec::new());
        assert!(report.overall_safe);
        assert_eq!(report.parse_tree.name, "Program");
    }
}
