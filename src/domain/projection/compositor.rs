//! Score & Probability Compositor.

use crate::domain::foundation::ValidationError;

use super::breakdown::ScoreBreakdown;

/// Combines fit and regret into scores, then normalizes with a two-way
/// softmax.
pub struct ScoreCompositor;

impl ScoreCompositor {
    /// `score_X = fit_X - lambda * regret_X`.
    pub fn compose(
        fit_a: f64,
        fit_b: f64,
        regret_a: f64,
        regret_b: f64,
        lambda: f64,
    ) -> Result<ScoreBreakdown, ValidationError> {
        ScoreBreakdown::new(fit_a - lambda * regret_a, fit_b - lambda * regret_b)
    }

    /// Two-way softmax, shifted by the larger score so neither exponent
    /// overflows. `probability_b` is `1 - probability_a`.
    pub fn probabilities(score_a: f64, score_b: f64) -> (f64, f64) {
        let max = score_a.max(score_b);
        let exp_a = (score_a - max).exp();
        let exp_b = (score_b - max).exp();
        let probability_a = exp_a / (exp_a + exp_b);
        (probability_a, 1.0 - probability_a)
    }
}
