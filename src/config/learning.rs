//! Feedback learning configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::feedback::LearningPolicy;
use crate::domain::foundation::ValidationError as DomainValidationError;

/// Lambda adaptation thresholds and limits
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LearningConfig {
    /// Regret rate at or above which lambda increases
    #[serde(default = "default_high_regret_threshold")]
    pub high_regret_threshold: f64,

    /// Regret rate at or below which lambda decreases
    #[serde(default = "default_low_regret_threshold")]
    pub low_regret_threshold: f64,

    #[serde(default = "default_increase_factor")]
    pub increase_factor: f64,

    #[serde(default = "default_decrease_factor")]
    pub decrease_factor: f64,

    #[serde(default = "default_lambda_ceiling")]
    pub lambda_ceiling: f64,

    #[serde(default = "default_lambda_floor")]
    pub lambda_floor: f64,

    /// Attempts at saving settings before giving up on version conflicts
    #[serde(default = "default_max_save_attempts")]
    pub max_save_attempts: u32,
}

impl LearningConfig {
    /// Domain policy built from these values.
    pub fn policy(&self) -> Result<LearningPolicy, DomainValidationError> {
        LearningPolicy::new(
            self.high_regret_threshold,
            self.low_regret_threshold,
            self.increase_factor,
            self.decrease_factor,
            self.lambda_ceiling,
            self.lambda_floor,
        )
    }

    /// Validate learning configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check(
            "learning.high_regret_threshold",
            self.high_regret_threshold,
            0.0,
            1.0,
        )?;
        ValidationError::check(
            "learning.low_regret_threshold",
            self.low_regret_threshold,
            0.0,
            1.0,
        )?;
        if self.low_regret_threshold > self.high_regret_threshold {
            return Err(ValidationError::InvalidRegretThresholds);
        }
        ValidationError::check("learning.increase_factor", self.increase_factor, 1.0, 10.0)?;
        ValidationError::check("learning.decrease_factor", self.decrease_factor, 0.0, 1.0)?;
        ValidationError::check("learning.lambda_floor", self.lambda_floor, 0.0, f64::MAX)?;
        ValidationError::check("learning.lambda_ceiling", self.lambda_ceiling, 0.0, f64::MAX)?;
        if self.lambda_floor > self.lambda_ceiling {
            return Err(ValidationError::InvalidLambdaBounds);
        }
        if self.max_save_attempts == 0 {
            return Err(ValidationError::OutOfRange {
                field: "learning.max_save_attempts",
                min: 1.0,
                max: f64::from(u32::MAX),
                actual: 0.0,
            });
        }
        Ok(())
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            high_regret_threshold: default_high_regret_threshold(),
            low_regret_threshold: default_low_regret_threshold(),
            increase_factor: default_increase_factor(),
            decrease_factor: default_decrease_factor(),
            lambda_ceiling: default_lambda_ceiling(),
            lambda_floor: default_lambda_floor(),
            max_save_attempts: default_max_save_attempts(),
        }
    }
}

fn default_high_regret_threshold() -> f64 {
    0.4
}

fn default_low_regret_threshold() -> f64 {
    0.1
}

fn default_increase_factor() -> f64 {
    1.1
}

fn default_decrease_factor() -> f64 {
    0.95
}

fn default_lambda_ceiling() -> f64 {
    2.0
}

fn default_lambda_floor() -> f64 {
    0.5
}

fn default_max_save_attempts() -> u32 {
    3
}
