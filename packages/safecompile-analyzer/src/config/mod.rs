//! Analyzer configuration
//!
//! ```rust,ignore
//! use safecompile_analyzer::config::{AnalyzerConfig, Preset};
//!
//! // Preset
//! let config = AnalyzerConfig::preset(Preset::Fast).build()?;
//!
//! // Preset with overrides
//! let config = AnalyzerConfig::preset(Preset::Balanced)
//!     .patterns(true)
//!     .context_radius(3)
//!     .build()?;
//!
//! // YAML v1
//! let config = AnalyzerConfig::from_yaml("safecompile.yaml")?;
//! ```

pub mod analyzer_config;
pub mod error;
pub mod io;
pub mod preset;

pub use analyzer_config::{AnalyzerConfig, MAX_CONTEXT_RADIUS};
pub use error::{ConfigError, ConfigResult};
pub use io::{ArithmeticOverrides, ConfigFileV1, DetectorOverrides, SUPPORTED_VERSIONS};
pub use preset::Preset;
