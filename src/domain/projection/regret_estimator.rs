//! Regret Estimator - per-option regret risk from feedback history and the
//! emotional tone of the evidence.

use crate::domain::feedback::FeedbackStats;
use crate::domain::foundation::{UnitInterval, ValidationError};

use super::breakdown::RegretBreakdown;
use super::evidence::EvidenceItem;
use super::vector::{cosine_similarity, Embedding};

/// Valence variance assumed when there is no evidence at all.
pub const NO_EVIDENCE_VARIANCE: f64 = 0.5;

/// Option negativity assumed when no evidence carries weight.
pub const NEUTRAL_NEGATIVITY: f64 = 0.5;

/// Computes regret risk for both options.
///
/// ```text
/// base_regret  = clamp(historical_rate + valence_variance * volatility_weight, 0, 1)
/// regret_X     = clamp(base_regret + (negativity_X - 0.5) * negativity_weight, 0, 1)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RegretEstimator {
    volatility_weight: f64,
    negativity_weight: f64,
}

impl RegretEstimator {
    pub fn new(volatility_weight: f64, negativity_weight: f64) -> Self {
        Self {
            volatility_weight,
            negativity_weight,
        }
    }

    pub fn estimate(
        &self,
        feedback: &FeedbackStats,
        regret_prior: f64,
        evidence: &[EvidenceItem],
        option_a: &Embedding,
        option_b: &Embedding,
    ) -> Result<RegretBreakdown, ValidationError> {
        let historical_regret_rate = feedback.regret_rate().unwrap_or(regret_prior);
        let valence_variance = Self::valence_variance(evidence);
        let option_negativity_a = Self::option_negativity(option_a, evidence)?;
        let option_negativity_b = Self::option_negativity(option_b, evidence)?;

        let base_regret = UnitInterval::clamped(
            historical_regret_rate + valence_variance * self.volatility_weight,
        )
        .value();
        let regret_risk_a = self.risk(base_regret, option_negativity_a);
        let regret_risk_b = self.risk(base_regret, option_negativity_b);

        tracing::trace!(
            historical_regret_rate,
            valence_variance,
            regret_risk_a,
            regret_risk_b,
            "regret estimated"
        );

        RegretBreakdown::new(
            historical_regret_rate,
            valence_variance,
            option_negativity_a,
            option_negativity_b,
            base_regret,
            regret_risk_a,
            regret_risk_b,
            feedback.total(),
        )
    }

    fn risk(&self, base_regret: f64, negativity: f64) -> f64 {
        UnitInterval::clamped(base_regret + (negativity - 0.5) * self.negativity_weight).value()
    }

    /// Population variance of evidence valences, clamped to [0, 1].
    pub fn valence_variance(evidence: &[EvidenceItem]) -> f64 {
        if evidence.is_empty() {
            return NO_EVIDENCE_VARIANCE;
        }
        let n = evidence.len() as f64;
        let mean = evidence.iter().map(EvidenceItem::valence).sum::<f64>() / n;
        let variance = evidence
            .iter()
            .map(|e| (e.valence() - mean).powi(2))
            .sum::<f64>()
            / n;
        UnitInterval::clamped(variance).value()
    }

    /// Similarity- and alignment-weighted mean of `(1 - valence) / 2`.
    pub fn option_negativity(
        option: &Embedding,
        evidence: &[EvidenceItem],
    ) -> Result<f64, ValidationError> {
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for item in evidence {
            let cos = cosine_similarity(option, item.embedding())?;
            let alignment = UnitInterval::clamped((cos + 1.0) / 2.0).value();
            let weight = item.similarity() * alignment;
            weighted += weight * (1.0 - item.valence()) / 2.0;
            total_weight += weight;
        }
        if total_weight <= 0.0 {
            return Ok(NEUTRAL_NEGATIVITY);
        }
        Ok(UnitInterval::clamped(weighted / total_weight).value())
    }
}
