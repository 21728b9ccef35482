//! Pipeline orchestration

pub mod analyze;
pub mod report;

pub use analyze::{run_analysis, SecurityReport};
pub use report::{render, render_json, render_text, ReportFormat, HEURISTIC_DISCLAIMER};
