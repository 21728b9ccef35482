//! Error types for safecompile-analyzer
//!
//! Malformed C input is never an error: the scanner and parser degrade to
//! `Unknown` tokens and diagnostics. Only contract violations and I/O surface here.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for analyzer operations
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Token list handed to the parser breaks the token contract
    #[error("Invalid token list: {0}")]
    InvalidTokens(String),

    /// External detector output could not be interpreted
    #[error("External findings error: {0}")]
    ExternalFindings(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AnalyzerError {
    /// Create an invalid-token-list error
    pub fn invalid_tokens(msg: impl Into<String>) -> Self {
        AnalyzerError::InvalidTokens(msg.into())
    }

    /// Create an external findings error
    pub fn external(msg: impl Into<String>) -> Self {
        AnalyzerError::ExternalFindings(msg.into())
    }
}

/// Result type alias for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;
