//! Configuration file schema (YAML v1)

use serde::{Deserialize, Serialize};

/// Schema versions this build can read
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
///
/// ```yaml
/// version: 1
/// preset: thorough
/// parallel: true
/// detectors:
///   arithmetic: true
///   patterns: false
/// arithmetic:
///   context_radius: 3
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1); optional only so its absence can be
    /// reported clearly
    #[serde(default)]
    pub version: Option<u32>,

    /// Base preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,

    /// Detector on/off switches, applied over the preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detectors: Option<DetectorOverrides>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arithmetic: Option<ArithmeticOverrides>,
}

/// Detector switches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectorOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arithmetic: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<bool>,
}

/// Arithmetic-risk heuristic tuning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArithmeticOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_radius: Option<usize>,
}
