//! Projection engine configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::ValidationError as DomainValidationError;
use crate::domain::projection::{CalculationParameters, ScoringWeights};

/// Scoring constants and evidence retrieval limits
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Lambda for users without adaptive settings
    #[serde(default = "default_lambda")]
    pub default_lambda: f64,

    /// Regret rate assumed before any feedback exists
    #[serde(default = "default_regret_prior")]
    pub default_regret_prior: f64,

    /// Extra weight for evidence related to the priority axis
    #[serde(default = "default_priority_axis_boost")]
    pub priority_axis_boost: f64,

    /// Weight of valence variance in base regret
    #[serde(default = "default_volatility_weight")]
    pub volatility_weight: f64,

    /// Weight of option negativity in regret risk
    #[serde(default = "default_negativity_weight")]
    pub negativity_weight: f64,

    /// Maximum evidence fragments fetched per decision
    #[serde(default = "default_evidence_top_k")]
    pub evidence_top_k: usize,

    /// Minimum similarity for a fragment to count as evidence
    #[serde(default)]
    pub min_evidence_similarity: f64,
}

impl EngineConfig {
    /// Fixed scoring weights.
    pub fn scoring_weights(&self) -> Result<ScoringWeights, DomainValidationError> {
        ScoringWeights::new(
            self.priority_axis_boost,
            self.volatility_weight,
            self.negativity_weight,
        )
    }

    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check("engine.default_lambda", self.default_lambda, 0.0, f64::MAX)?;
        ValidationError::check(
            "engine.default_regret_prior",
            self.default_regret_prior,
            0.0,
            1.0,
        )?;
        ValidationError::check(
            "engine.priority_axis_boost",
            self.priority_axis_boost,
            0.0,
            f64::MAX,
        )?;
        ValidationError::check(
            "engine.volatility_weight",
            self.volatility_weight,
            0.0,
            f64::MAX,
        )?;
        ValidationError::check(
            "engine.negativity_weight",
            self.negativity_weight,
            0.0,
            f64::MAX,
        )?;
        ValidationError::check(
            "engine.min_evidence_similarity",
            self.min_evidence_similarity,
            0.0,
            1.0,
        )?;
        if self.evidence_top_k == 0 {
            return Err(ValidationError::OutOfRange {
                field: "engine.evidence_top_k",
                min: 1.0,
                max: f64::MAX,
                actual: 0.0,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_lambda: default_lambda(),
            default_regret_prior: default_regret_prior(),
            priority_axis_boost: default_priority_axis_boost(),
            volatility_weight: default_volatility_weight(),
            negativity_weight: default_negativity_weight(),
            evidence_top_k: default_evidence_top_k(),
            min_evidence_similarity: 0.0,
        }
    }
}

fn default_lambda() -> f64 {
    CalculationParameters::DEFAULT_LAMBDA
}

fn default_regret_prior() -> f64 {
    CalculationParameters::DEFAULT_REGRET_PRIOR
}

fn default_priority_axis_boost() -> f64 {
    ScoringWeights::DEFAULT_PRIORITY_AXIS_BOOST
}

fn default_volatility_weight() -> f64 {
    ScoringWeights::DEFAULT_VOLATILITY_WEIGHT
}

fn default_negativity_weight() -> f64 {
    ScoringWeights::DEFAULT_NEGATIVITY_WEIGHT
}

fn default_evidence_top_k() -> usize {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_lambda, 1.0);
        assert_eq!(config.default_regret_prior, 0.2);
        assert_eq!(config.evidence_top_k, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_prior_above_one() {
        let config = EngineConfig {
            default_regret_prior: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::OutOfRange {
                field: "engine.default_regret_prior",
                ..
            })
        ));
    }

    #[test]
    fn test_validation_rejects_zero_top_k() {
        let config = EngineConfig {
            evidence_top_k: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_weight() {
        let config = EngineConfig {
            negativity_weight: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
