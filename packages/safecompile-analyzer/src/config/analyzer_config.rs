//! Analyzer configuration
//!
//! Two levels:
//! - Preset: `AnalyzerConfig::preset(Preset::Thorough)`
//! - Overrides: builder calls, or a YAML v1 file via [`AnalyzerConfig::from_yaml`]
//!
//! Every constructor path ends in [`AnalyzerConfig::validate`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ConfigError, ConfigResult};
use super::io::{ArithmeticOverrides, ConfigFileV1, DetectorOverrides, SUPPORTED_VERSIONS};
use super::preset::Preset;

/// Largest accepted bounds-check window radius, in lines
pub const MAX_CONTEXT_RADIUS: usize = 10;

/// Resolved analyzer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    preset: Preset,
    arithmetic: bool,
    patterns: bool,
    context_radius: usize,
    parallel: bool,
}

impl AnalyzerConfig {
    /// Start from a preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            arithmetic: preset.arithmetic_enabled(),
            patterns: preset.patterns_enabled(),
            context_radius: preset.context_radius(),
            parallel: true,
        }
    }

    pub fn arithmetic(mut self, enabled: bool) -> Self {
        self.arithmetic = enabled;
        self
    }

    pub fn patterns(mut self, enabled: bool) -> Self {
        self.patterns = enabled;
        self
    }

    pub fn context_radius(mut self, radius: usize) -> Self {
        self.context_radius = radius;
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn get_preset(&self) -> Preset {
        self.preset
    }

    pub fn arithmetic_enabled(&self) -> bool {
        self.arithmetic
    }

    pub fn patterns_enabled(&self) -> bool {
        self.patterns
    }

    pub fn get_context_radius(&self) -> usize {
        self.context_radius
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Range checks
    pub fn validate(&self) -> ConfigResult<()> {
        if self.context_radius > MAX_CONTEXT_RADIUS {
            return Err(ConfigError::range_with_hint(
                "arithmetic.context_radius",
                self.context_radius,
                0,
                MAX_CONTEXT_RADIUS,
                "The bounds-check window is measured in lines on each side of the operation",
            ));
        }
        Ok(())
    }

    /// Validate and return self
    pub fn build(self) -> ConfigResult<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Load from YAML file (v1 schema)
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading analyzer config");
        Self::from_yaml_str(&content)
    }

    /// Parse YAML text (v1 schema)
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        // Version check
        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match file.preset.as_deref() {
            Some(name) => Preset::from_str(name)?,
            None => Preset::default(),
        };
        let mut config = Self::preset(preset);

        if let Some(parallel) = file.parallel {
            config.parallel = parallel;
        }
        if let Some(detectors) = file.detectors {
            if let Some(arithmetic) = detectors.arithmetic {
                config.arithmetic = arithmetic;
            }
            if let Some(patterns) = detectors.patterns {
                config.patterns = patterns;
            }
        }
        if let Some(radius) = file.arithmetic.and_then(|a| a.context_radius) {
            config.context_radius = radius;
        }

        config.build()
    }

    /// Export to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            preset: Some(self.preset.to_string()),
            parallel: Some(self.parallel),
            detectors: Some(DetectorOverrides {
                arithmetic: Some(self.arithmetic),
                patterns: Some(self.patterns),
            }),
            arithmetic: Some(ArithmeticOverrides {
                context_radius: Some(self.context_radius),
            }),
        };

        serde_yaml::to_string(&file).map_err(ConfigError::Yaml)
    }

    /// One-line summary for logs and report headers
    pub fn describe(&self) -> String {
        let mut detectors = vec!["parser"];
        if self.arithmetic {
            detectors.push("arithmetic");
        }
        if self.patterns {
            detectors.push("patterns");
        }
        format!(
            "preset={} detectors=[{}] context_radius={} parallel={}",
            self.preset,
            detectors.join(", "),
            self.context_radius,
            self.parallel
        )
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}
