//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("{field} must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Low regret threshold must not exceed high regret threshold")]
    InvalidRegretThresholds,

    #[error("Lambda floor must not exceed lambda ceiling")]
    InvalidLambdaBounds,

    #[error("Default lambda must lie between lambda floor and ceiling")]
    DefaultLambdaOutOfBounds,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Embedding dimension must be positive")]
    InvalidDimension,

    #[error("Invalid embedding base URL")]
    InvalidBaseUrl,

    #[error("Invalid log filter directive: {0}")]
    InvalidLogDirective(String),
}

impl ValidationError {
    /// Checks that `actual` is finite and inside `[min, max]`.
    pub(crate) fn check(
        field: &'static str,
        actual: f64,
        min: f64,
        max: f64,
    ) -> Result<(), ValidationError> {
        if !actual.is_finite() || actual < min || actual > max {
            return Err(ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            });
        }
        Ok(())
    }
}
