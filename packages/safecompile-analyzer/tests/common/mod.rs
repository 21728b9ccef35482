//! Common test utilities for safecompile-analyzer
//!
//! Shared C fixtures and assertions for the integration tests. Each test
//! binary uses a different subset.
#![allow(dead_code)]

mod assertions;
mod fixtures;

// Re-export all utilities
pub use assertions::*;
pub use fixtures::*;
