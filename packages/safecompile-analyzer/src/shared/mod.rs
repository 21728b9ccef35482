//! Shared module - Common types and utilities
//!
//! Types every feature depends on. Nothing here knows about C syntax.

pub mod models;
pub mod utils;

// Re-exports for convenience
pub use models::*;
