//! Detection features
//!
//! Each feature is independent and only shares `shared::models`.

pub mod aggregation;
pub mod arithmetic_risk;
pub mod external;
pub mod lexing;
pub mod parsing;
pub mod pattern_matching;
