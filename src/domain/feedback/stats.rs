//! Per-user feedback counts and the regret rate derived from them.

use serde::{Deserialize, Serialize};

use super::outcome::FeedbackOutcome;

/// Counts of each feedback outcome for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackStats {
    pub no_regret: u64,
    pub partial_regret: u64,
    pub regret: u64,
}

impl FeedbackStats {
    pub fn new(no_regret: u64, partial_regret: u64, regret: u64) -> Self {
        Self {
            no_regret,
            partial_regret,
            regret,
        }
    }

    /// Builds stats from a sequence of outcomes.
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a FeedbackOutcome>) -> Self {
        outcomes
            .into_iter()
            .fold(Self::default(), |stats, outcome| stats.with(*outcome))
    }

    /// Returns a copy with one more outcome counted.
    pub fn with(mut self, outcome: FeedbackOutcome) -> Self {
        match outcome {
            FeedbackOutcome::NoRegret => self.no_regret += 1,
            FeedbackOutcome::PartialRegret => self.partial_regret += 1,
            FeedbackOutcome::Regret => self.regret += 1,
        }
        self
    }

    pub fn total(&self) -> u64 {
        self.no_regret + self.partial_regret + self.regret
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Signal-weighted mean regret in [0, 1]; `None` without feedback.
    pub fn regret_rate(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let weighted = self.no_regret as f64 * FeedbackOutcome::NoRegret.regret_signal()
            + self.partial_regret as f64 * FeedbackOutcome::PartialRegret.regret_signal()
            + self.regret as f64 * FeedbackOutcome::Regret.regret_signal();
        Some((weighted / total as f64).clamp(0.0, 1.0))
    }

    /// Fraction of feedback that was an outright regret.
    pub fn count_ratio(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(self.regret as f64 / total as f64)
    }
}
