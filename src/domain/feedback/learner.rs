//! Feedback learner - nudges regret sensitivity from accumulated outcomes.
//!
//! A proportional controller with a dead band: a high cumulative regret
//! rate raises lambda, a low one lowers it, anything in between leaves it
//! alone. The learner only returns an instruction; persisting it is the
//! caller's job, and it never touches results already computed.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Thresholds and step factors for lambda adaptation.
///
/// Only [`LearningPolicy::new`] and the default build one, so the bounds are
/// always ordered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LearningPolicyRaw")]
pub struct LearningPolicy {
    high_regret_threshold: f64,
    low_regret_threshold: f64,
    increase_factor: f64,
    decrease_factor: f64,
    lambda_ceiling: f64,
    lambda_floor: f64,
}

#[derive(Deserialize)]
struct LearningPolicyRaw {
    high_regret_threshold: f64,
    low_regret_threshold: f64,
    increase_factor: f64,
    decrease_factor: f64,
    lambda_ceiling: f64,
    lambda_floor: f64,
}

impl LearningPolicy {
    pub fn new(
        high_regret_threshold: f64,
        low_regret_threshold: f64,
        increase_factor: f64,
        decrease_factor: f64,
        lambda_ceiling: f64,
        lambda_floor: f64,
    ) -> Result<Self, ValidationError> {
        let high =
            ValidationError::check_range("high_regret_threshold", high_regret_threshold, 0.0, 1.0)?;
        let low =
            ValidationError::check_range("low_regret_threshold", low_regret_threshold, 0.0, high)?;
        let increase =
            ValidationError::check_range("increase_factor", increase_factor, 1.0, f64::MAX)?;
        let decrease =
            ValidationError::check_range("decrease_factor", decrease_factor, 0.0, 1.0)?;
        let floor = ValidationError::check_range("lambda_floor", lambda_floor, 0.0, f64::MAX)?;
        let ceiling =
            ValidationError::check_range("lambda_ceiling", lambda_ceiling, floor, f64::MAX)?;

        Ok(Self {
            high_regret_threshold: high,
            low_regret_threshold: low,
            increase_factor: increase,
            decrease_factor: decrease,
            lambda_ceiling: ceiling,
            lambda_floor: floor,
        })
    }

    pub fn high_regret_threshold(&self) -> f64 {
        self.high_regret_threshold
    }

    pub fn low_regret_threshold(&self) -> f64 {
        self.low_regret_threshold
    }

    pub fn increase_factor(&self) -> f64 {
        self.increase_factor
    }

    pub fn decrease_factor(&self) -> f64 {
        self.decrease_factor
    }

    pub fn lambda_ceiling(&self) -> f64 {
        self.lambda_ceiling
    }

    pub fn lambda_floor(&self) -> f64 {
        self.lambda_floor
    }
}

impl TryFrom<LearningPolicyRaw> for LearningPolicy {
    type Error = ValidationError;

    fn try_from(raw: LearningPolicyRaw) -> Result<Self, Self::Error> {
        Self::new(
            raw.high_regret_threshold,
            raw.low_regret_threshold,
            raw.increase_factor,
            raw.decrease_factor,
            raw.lambda_ceiling,
            raw.lambda_floor,
        )
    }
}

impl Default for LearningPolicy {
    fn default() -> Self {
        Self {
            high_regret_threshold: 0.4,
            low_regret_threshold: 0.1,
            increase_factor: 1.1,
            decrease_factor: 0.95,
            lambda_ceiling: 2.0,
            lambda_floor: 0.5,
        }
    }
}

/// Instruction produced by the learner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub enum LambdaAdjustment {
    Increase { from: f64, to: f64 },
    Decrease { from: f64, to: f64 },
    Unchanged,
}

impl LambdaAdjustment {
    /// New lambda, or `None` when unchanged.
    pub fn new_lambda(&self) -> Option<f64> {
        match self {
            Self::Increase { to, .. } | Self::Decrease { to, .. } => Some(*to),
            Self::Unchanged => None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Evaluates a regret rate against the current lambda.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackLearner {
    policy: LearningPolicy,
}

impl FeedbackLearner {
    pub fn new(policy: LearningPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LearningPolicy {
        &self.policy
    }

    /// Single adaptation step.
    pub fn evaluate(&self, regret_rate: f64, lambda: f64) -> LambdaAdjustment {
        let p = &self.policy;
        if regret_rate >= p.high_regret_threshold && lambda < p.lambda_ceiling {
            let to = (lambda * p.increase_factor).min(p.lambda_ceiling);
            return LambdaAdjustment::Increase { from: lambda, to };
        }
        if regret_rate <= p.low_regret_threshold && lambda > p.lambda_floor {
            let to = (lambda * p.decrease_factor).max(p.lambda_floor);
            return LambdaAdjustment::Decrease { from: lambda, to };
        }
        LambdaAdjustment::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn learner() -> FeedbackLearner {
        FeedbackLearner::default()
    }

    #[test]
    fn high_regret_increases_lambda() {
        let adj = learner().evaluate(0.5, 1.0);
        assert!((adj.new_lambda().unwrap() - 1.1).abs() < 1e-12);
        assert!(matches!(adj, LambdaAdjustment::Increase { .. }));
    }

    #[test]
    fn low_regret_decreases_lambda() {
        let adj = learner().evaluate(0.05, 1.0);
        assert!((adj.new_lambda().unwrap() - 0.95).abs() < 1e-12);
        assert!(matches!(adj, LambdaAdjustment::Decrease { .. }));
    }

    #[test]
    fn dead_band_leaves_lambda_alone() {
        assert_eq!(learner().evaluate(0.2, 1.0), LambdaAdjustment::Unchanged);
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert!(learner().evaluate(0.4, 1.0).is_change());
        assert!(learner().evaluate(0.1, 1.0).is_change());
    }

    #[test]
    fn increase_is_capped_at_ceiling() {
        let adj = learner().evaluate(0.9, 1.95);
        assert_eq!(adj.new_lambda(), Some(2.0));
        assert_eq!(learner().evaluate(0.9, 2.0), LambdaAdjustment::Unchanged);
    }

    #[test]
    fn decrease_is_capped_at_floor() {
        let adj = learner().evaluate(0.0, 0.51);
        assert_eq!(adj.new_lambda(), Some(0.5));
        assert_eq!(learner().evaluate(0.0, 0.5), LambdaAdjustment::Unchanged);
    }

    #[test]
    fn policy_rejects_low_threshold_above_high() {
        assert!(LearningPolicy::new(0.3, 0.5, 1.1, 0.95, 2.0, 0.5).is_err());
    }

    #[test]
    fn policy_rejects_ceiling_below_floor() {
        assert!(LearningPolicy::new(0.4, 0.1, 1.1, 0.95, 0.4, 0.5).is_err());
    }

    #[test]
    fn policy_rejects_inverted_lambda_bounds() {
        let result = LearningPolicy::new(0.4, 0.1, 1.1, 0.95, 0.1, 3.0);
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn deserializing_policy_applies_constructor_checks() {
        let json = serde_json::json!({
            "high_regret_threshold": 0.4,
            "low_regret_threshold": 0.1,
            "increase_factor": 1.1,
            "decrease_factor": 0.95,
            "lambda_ceiling": 0.1,
            "lambda_floor": 3.0,
        });
        assert!(serde_json::from_value::<LearningPolicy>(json).is_err());

        let json = serde_json::to_value(LearningPolicy::default()).unwrap();
        let policy: LearningPolicy = serde_json::from_value(json).unwrap();
        assert_eq!(policy.lambda_ceiling(), 2.0);
        assert_eq!(policy.lambda_floor(), 0.5);
    }

    #[test]
    fn adjustment_serializes_with_direction_tag() {
        let json =
            serde_json::to_value(LambdaAdjustment::Increase { from: 1.0, to: 1.1 }).unwrap();
        assert_eq!(json["direction"], "increase");
    }

    proptest! {
        #[test]
        fn lambda_never_leaves_bounds(rates in prop::collection::vec(0.0f64..=1.0, 0..200)) {
            let learner = learner();
            let mut lambda = 1.0;
            for rate in rates {
                if let Some(next) = learner.evaluate(rate, lambda).new_lambda() {
                    lambda = next;
                }
                prop_assert!((0.5..=2.0).contains(&lambda));
            }
        }
    }
}
