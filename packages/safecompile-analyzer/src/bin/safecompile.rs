//! SafeCompile CLI
//!
//! # Usage
//!
//! ```bash
//! # Text report with the default (balanced) preset
//! safecompile src/main.c
//!
//! # Everything on, JSON output, parse tree as Graphviz
//! safecompile src/main.c --preset thorough --format json --dot tree.dot
//!
//! # Merge findings from an external reviewer
//! safecompile src/main.c --external llm.json -v
//! ```
//!
//! Exits non-zero only when the source file or the config cannot be loaded.
//! Findings never change the exit code.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use safecompile_analyzer::config::{AnalyzerConfig, Preset};
use safecompile_analyzer::features::external::load_external_findings;
use safecompile_analyzer::features::parsing::to_dot;
use safecompile_analyzer::pipeline::{render, run_analysis, ReportFormat, SecurityReport};
use safecompile_analyzer::shared::models::Finding;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "safecompile", version)]
#[command(about = "Static security analysis for C source files", long_about = None)]
struct Cli {
    /// C source file to analyze
    file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// YAML configuration file (version 1)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Detector preset: fast (parser only), balanced (default: parser, patterns,
    /// arithmetic), thorough (balanced with a one-line bounds-check window)
    #[arg(long, conflicts_with = "config")]
    preset: Option<String>,

    /// JSON findings from an external detector (repeatable)
    #[arg(long)]
    external: Vec<PathBuf>,

    /// Write the parse tree as Graphviz DOT to this path
    #[arg(long)]
    dot: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(cli: &Cli) -> Result<AnalyzerConfig, Box<dyn std::error::Error>> {
    let config = match (&cli.config, &cli.preset) {
        (Some(path), _) => AnalyzerConfig::from_yaml(path)?,
        (None, Some(name)) => AnalyzerConfig::preset(Preset::from_str(name)?).build()?,
        (None, None) => AnalyzerConfig::default(),
    };
    Ok(config)
}

/// Unreadable or unparseable files are logged and skipped
fn load_external(paths: &[PathBuf]) -> Vec<Vec<Finding>> {
    paths
        .iter()
        .filter_map(|path| match load_external_findings(path) {
            Ok(findings) => {
                info!(path = %path.display(), count = findings.len(), "loaded external findings");
                Some(findings)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping external findings");
                None
            }
        })
        .collect()
}

fn write_dot(report: &SecurityReport, path: &Path) {
    match std::fs::write(path, to_dot(&report.parse_tree)) {
        Ok(()) => info!(path = %path.display(), "parse tree written"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to write parse tree"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    info!(config = %config.describe(), "configuration resolved");

    let bytes = std::fs::read(&cli.file)
        .map_err(|e| format!("cannot read {}: {}", cli.file.display(), e))?;
    let source = String::from_utf8_lossy(&bytes);

    let external = load_external(&cli.external);
    let report = run_analysis(&source, &config, external);

    if let Some(path) = &cli.dot {
        write_dot(&report, path);
    }

    let file_name = cli.file.display().to_string();
    let rendered = render(&report, cli.format.into(), &file_name)?;
    println!("{}", rendered.trim_end());

    Ok(())
}
