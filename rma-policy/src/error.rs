//! Error types for policy evaluation.

use thiserror::Error;

/// Errors produced by the policy crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// A date string did not parse as `YYYY-MM-DD`. `field` names the
    /// offending input.
    #[error("invalid {field} '{value}': expected YYYY-MM-DD")]
    InvalidDateFormat { field: &'static str, value: String },
}

/// Convenience alias for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;
