//! Preset configurations
//!
//! A preset picks which text detectors run alongside the parser and how wide
//! the bounds-check window is. The parser always runs because the report
//! needs the parse tree.

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use crate::features::arithmetic_risk::DEFAULT_CONTEXT_RADIUS;

/// Configuration preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Parser only
    Fast,

    /// Parser + pattern detector + arithmetic-risk heuristic
    #[default]
    Balanced,

    /// Balanced, but a bounds check must sit within one line of the operation
    Thorough,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
        }
    }

    pub fn arithmetic_enabled(&self) -> bool {
        !matches!(self, Self::Fast)
    }

    pub fn patterns_enabled(&self) -> bool {
        !matches!(self, Self::Fast)
    }

    /// Lines inspected on each side of a risky operation
    pub fn context_radius(&self) -> usize {
        match self {
            Self::Thorough => 1,
            Self::Fast | Self::Balanced => DEFAULT_CONTEXT_RADIUS,
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
