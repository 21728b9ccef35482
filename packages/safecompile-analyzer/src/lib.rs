/*
 * SafeCompile Analyzer - Static security analysis for a C subset
 *
 * Feature-First Architecture:
 * - shared/      : Common models (Token, Finding, Severity)
 * - features/    : Vertical slices (lexing → parsing → arithmetic_risk / pattern_matching → aggregation)
 * - config/      : Presets + YAML v1 configuration
 * - pipeline/    : Orchestration and report rendering
 *
 * Malformed input never fails an analysis: the scanner degrades to
 * Unknown tokens and the parser to diagnostics.
 */

// Crate-level lint configuration
#![allow(clippy::should_implement_trait)] // from_str naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Configuration (presets, YAML v1)
pub mod config;

/// Error types
pub mod errors;

/// Detection features
pub mod features;

/// End-to-end analysis and reports
pub mod pipeline;

/// Shared models and utilities
pub mod shared;

pub use config::{AnalyzerConfig, ConfigError, Preset};
pub use errors::{AnalyzerError, Result};
pub use features::aggregation::{aggregate, FindingAggregator};
pub use features::arithmetic_risk::ArithmeticRiskScanner;
pub use features::external::{load_external_findings, parse_external_findings};
pub use features::lexing::{scan, tokenize};
pub use features::parsing::{
    analyze_source, to_dot, Diagnostic, DiagnosticKind, ParseOutcome, ParseTreeNode, Parser,
};
pub use features::pattern_matching::detect_patterns;
pub use pipeline::{run_analysis, ReportFormat, SecurityReport};
pub use shared::models::{Finding, Severity, Token, TokenKind};
pub use shared::utils::numbered_source;
