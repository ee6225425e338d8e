//! Immutable result records produced by the projection pipeline.
//!
//! Every record validates its invariants at construction so a breakdown that
//! exists is a breakdown that can be audited. The scorers only ever produce
//! clamped values, so these checks fail only on hand-built inputs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{FragmentId, ValidationError};

use super::value_axis::ValueAxis;

/// Maximum number of fragment contributions kept in a fit breakdown.
pub const MAX_CONTRIBUTIONS: usize = 10;

/// Formula tag recorded with every score breakdown.
pub const SCORE_FORMULA: &str = "fit - lambda * regret";

fn unit(field: &str, value: f64) -> Result<f64, ValidationError> {
    ValidationError::check_range(field, value, 0.0, 1.0)
}

fn non_negative(field: &str, value: f64) -> Result<f64, ValidationError> {
    ValidationError::check_range(field, value, 0.0, f64::MAX)
}

fn finite(field: &str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::non_finite(field));
    }
    Ok(value)
}

/// Fixed scoring weights shared by every user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScoringWeightsRaw")]
pub struct ScoringWeights {
    priority_axis_boost: f64,
    volatility_weight: f64,
    negativity_weight: f64,
}

#[derive(Deserialize)]
struct ScoringWeightsRaw {
    priority_axis_boost: f64,
    volatility_weight: f64,
    negativity_weight: f64,
}

impl ScoringWeights {
    pub const DEFAULT_PRIORITY_AXIS_BOOST: f64 = 0.35;
    pub const DEFAULT_VOLATILITY_WEIGHT: f64 = 0.3;
    pub const DEFAULT_NEGATIVITY_WEIGHT: f64 = 0.3;

    pub fn new(
        priority_axis_boost: f64,
        volatility_weight: f64,
        negativity_weight: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            priority_axis_boost: non_negative("priority_axis_boost", priority_axis_boost)?,
            volatility_weight: non_negative("volatility_weight", volatility_weight)?,
            negativity_weight: non_negative("negativity_weight", negativity_weight)?,
        })
    }

    /// Extra weight for evidence related to the priority axis.
    pub fn priority_axis_boost(&self) -> f64 {
        self.priority_axis_boost
    }

    /// Weight of valence variance in base regret.
    pub fn volatility_weight(&self) -> f64 {
        self.volatility_weight
    }

    /// Weight of option negativity in regret risk.
    pub fn negativity_weight(&self) -> f64 {
        self.negativity_weight
    }
}

impl TryFrom<ScoringWeightsRaw> for ScoringWeights {
    type Error = ValidationError;

    fn try_from(raw: ScoringWeightsRaw) -> Result<Self, Self::Error> {
        Self::new(
            raw.priority_axis_boost,
            raw.volatility_weight,
            raw.negativity_weight,
        )
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            priority_axis_boost: Self::DEFAULT_PRIORITY_AXIS_BOOST,
            volatility_weight: Self::DEFAULT_VOLATILITY_WEIGHT,
            negativity_weight: Self::DEFAULT_NEGATIVITY_WEIGHT,
        }
    }
}

/// Parameters for one projection: the user's adaptive values plus the
/// fixed weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CalculationParametersRaw")]
pub struct CalculationParameters {
    lambda: f64,
    regret_prior: f64,
    #[serde(flatten)]
    weights: ScoringWeights,
}

#[derive(Deserialize)]
struct CalculationParametersRaw {
    lambda: f64,
    regret_prior: f64,
    priority_axis_boost: f64,
    volatility_weight: f64,
    negativity_weight: f64,
}

impl CalculationParameters {
    pub const DEFAULT_LAMBDA: f64 = 1.0;
    pub const DEFAULT_REGRET_PRIOR: f64 = 0.2;

    pub fn new(
        lambda: f64,
        regret_prior: f64,
        weights: ScoringWeights,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            lambda: non_negative("lambda", lambda)?,
            regret_prior: unit("regret_prior", regret_prior)?,
            weights,
        })
    }

    /// Regret sensitivity.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn regret_prior(&self) -> f64 {
        self.regret_prior
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn priority_axis_boost(&self) -> f64 {
        self.weights.priority_axis_boost
    }

    pub fn volatility_weight(&self) -> f64 {
        self.weights.volatility_weight
    }

    pub fn negativity_weight(&self) -> f64 {
        self.weights.negativity_weight
    }
}

impl TryFrom<CalculationParametersRaw> for CalculationParameters {
    type Error = ValidationError;

    fn try_from(raw: CalculationParametersRaw) -> Result<Self, Self::Error> {
        let weights = ScoringWeights::new(
            raw.priority_axis_boost,
            raw.volatility_weight,
            raw.negativity_weight,
        )?;
        Self::new(raw.lambda, raw.regret_prior, weights)
    }
}

impl Default for CalculationParameters {
    fn default() -> Self {
        Self {
            lambda: Self::DEFAULT_LAMBDA,
            regret_prior: Self::DEFAULT_REGRET_PRIOR,
            weights: ScoringWeights::default(),
        }
    }
}

/// How much one fragment pushed each option's fit score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentContribution {
    pub fragment_id: FragmentId,
    pub summary: String,
    pub similarity: f64,
    pub valence_weight: f64,
    pub priority_weight: f64,
    pub contribution_to_a: f64,
    pub contribution_to_b: f64,
}

impl FragmentContribution {
    /// Sort key for ranking contributions.
    pub fn combined(&self) -> f64 {
        self.contribution_to_a + self.contribution_to_b
    }
}

/// Pattern-fit result for both options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FitBreakdownRaw")]
pub struct FitBreakdown {
    fit_score_a: f64,
    fit_score_b: f64,
    total_weight: f64,
    priority_axis: Option<ValueAxis>,
    priority_axis_boost: f64,
    contributions: Vec<FragmentContribution>,
}

impl FitBreakdown {
    /// Creates a fit breakdown.
    ///
    /// Contributions must number at most [`MAX_CONTRIBUTIONS`] and be ordered
    /// by combined contribution, highest first.
    pub fn new(
        fit_score_a: f64,
        fit_score_b: f64,
        total_weight: f64,
        priority_axis: Option<ValueAxis>,
        priority_axis_boost: f64,
        contributions: Vec<FragmentContribution>,
    ) -> Result<Self, ValidationError> {
        if contributions.len() > MAX_CONTRIBUTIONS {
            return Err(ValidationError::out_of_range(
                "contributions",
                0.0,
                MAX_CONTRIBUTIONS as f64,
                contributions.len() as f64,
            ));
        }
        for pair in contributions.windows(2) {
            if pair[0].combined() < pair[1].combined() {
                return Err(ValidationError::invalid_order("contributions"));
            }
        }
        Ok(Self {
            fit_score_a: unit("fit_score_a", fit_score_a)?,
            fit_score_b: unit("fit_score_b", fit_score_b)?,
            total_weight: non_negative("total_weight", total_weight)?,
            priority_axis,
            priority_axis_boost: non_negative("priority_axis_boost", priority_axis_boost)?,
            contributions,
        })
    }

    /// Neutral breakdown used when there is no evidence.
    pub fn neutral(priority_axis: Option<ValueAxis>, priority_axis_boost: f64) -> Self {
        Self {
            fit_score_a: 0.5,
            fit_score_b: 0.5,
            total_weight: 0.0,
            priority_axis,
            priority_axis_boost,
            contributions: Vec::new(),
        }
    }

    pub fn fit_score_a(&self) -> f64 {
        self.fit_score_a
    }

    pub fn fit_score_b(&self) -> f64 {
        self.fit_score_b
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn priority_axis(&self) -> Option<ValueAxis> {
        self.priority_axis
    }

    pub fn priority_axis_boost(&self) -> f64 {
        self.priority_axis_boost
    }

    pub fn contributions(&self) -> &[FragmentContribution] {
        &self.contributions
    }
}

#[derive(Deserialize)]
struct FitBreakdownRaw {
    fit_score_a: f64,
    fit_score_b: f64,
    total_weight: f64,
    priority_axis: Option<ValueAxis>,
    priority_axis_boost: f64,
    contributions: Vec<FragmentContribution>,
}

impl TryFrom<FitBreakdownRaw> for FitBreakdown {
    type Error = ValidationError;

    fn try_from(raw: FitBreakdownRaw) -> Result<Self, Self::Error> {
        Self::new(
            raw.fit_score_a,
            raw.fit_score_b,
            raw.total_weight,
            raw.priority_axis,
            raw.priority_axis_boost,
            raw.contributions,
        )
    }
}

/// Regret-risk result for both options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegretBreakdownRaw")]
pub struct RegretBreakdown {
    historical_regret_rate: f64,
    valence_variance: f64,
    option_negativity_a: f64,
    option_negativity_b: f64,
    base_regret: f64,
    regret_risk_a: f64,
    regret_risk_b: f64,
    feedback_count: u64,
}

impl RegretBreakdown {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        historical_regret_rate: f64,
        valence_variance: f64,
        option_negativity_a: f64,
        option_negativity_b: f64,
        base_regret: f64,
        regret_risk_a: f64,
        regret_risk_b: f64,
        feedback_count: u64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            historical_regret_rate: unit("historical_regret_rate", historical_regret_rate)?,
            valence_variance: unit("valence_variance", valence_variance)?,
            option_negativity_a: unit("option_negativity_a", option_negativity_a)?,
            option_negativity_b: unit("option_negativity_b", option_negativity_b)?,
            base_regret: unit("base_regret", base_regret)?,
            regret_risk_a: unit("regret_risk_a", regret_risk_a)?,
            regret_risk_b: unit("regret_risk_b", regret_risk_b)?,
            feedback_count,
        })
    }

    pub fn historical_regret_rate(&self) -> f64 {
        self.historical_regret_rate
    }

    pub fn valence_variance(&self) -> f64 {
        self.valence_variance
    }

    pub fn option_negativity_a(&self) -> f64 {
        self.option_negativity_a
    }

    pub fn option_negativity_b(&self) -> f64 {
        self.option_negativity_b
    }

    pub fn base_regret(&self) -> f64 {
        self.base_regret
    }

    pub fn regret_risk_a(&self) -> f64 {
        self.regret_risk_a
    }

    pub fn regret_risk_b(&self) -> f64 {
        self.regret_risk_b
    }

    pub fn feedback_count(&self) -> u64 {
        self.feedback_count
    }
}

#[derive(Deserialize)]
struct RegretBreakdownRaw {
    historical_regret_rate: f64,
    valence_variance: f64,
    option_negativity_a: f64,
    option_negativity_b: f64,
    base_regret: f64,
    regret_risk_a: f64,
    regret_risk_b: f64,
    feedback_count: u64,
}

impl TryFrom<RegretBreakdownRaw> for RegretBreakdown {
    type Error = ValidationError;

    fn try_from(raw: RegretBreakdownRaw) -> Result<Self, Self::Error> {
        Self::new(
            raw.historical_regret_rate,
            raw.valence_variance,
            raw.option_negativity_a,
            raw.option_negativity_b,
            raw.base_regret,
            raw.regret_risk_a,
            raw.regret_risk_b,
            raw.feedback_count,
        )
    }
}

/// Final unnormalized scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScoreBreakdownRaw")]
pub struct ScoreBreakdown {
    score_a: f64,
    score_b: f64,
    formula: String,
}

impl ScoreBreakdown {
    pub fn new(score_a: f64, score_b: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            score_a: finite("score_a", score_a)?,
            score_b: finite("score_b", score_b)?,
            formula: SCORE_FORMULA.to_string(),
        })
    }

    pub fn score_a(&self) -> f64 {
        self.score_a
    }

    pub fn score_b(&self) -> f64 {
        self.score_b
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }
}

#[derive(Deserialize)]
struct ScoreBreakdownRaw {
    score_a: f64,
    score_b: f64,
}

impl TryFrom<ScoreBreakdownRaw> for ScoreBreakdown {
    type Error = ValidationError;

    fn try_from(raw: ScoreBreakdownRaw) -> Result<Self, Self::Error> {
        Self::new(raw.score_a, raw.score_b)
    }
}

/// Everything needed to reproduce a decision result from its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationBreakdown {
    pub fit: FitBreakdown,
    pub regret: RegretBreakdown,
    pub parameters: CalculationParameters,
    pub score: ScoreBreakdown,
}

/// Descriptive projection for a binary choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DecisionResultRaw")]
pub struct DecisionResult {
    probability_a: f64,
    probability_b: f64,
    regret_risk_a: f64,
    regret_risk_b: f64,
    evidence_ids: Vec<FragmentId>,
    value_alignment: BTreeMap<ValueAxis, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    breakdown: Option<CalculationBreakdown>,
}

impl DecisionResult {
    /// Tolerance for the probabilities summing to one.
    pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

    pub fn new(
        probability_a: f64,
        probability_b: f64,
        regret_risk_a: f64,
        regret_risk_b: f64,
        evidence_ids: Vec<FragmentId>,
        value_alignment: BTreeMap<ValueAxis, f64>,
        breakdown: Option<CalculationBreakdown>,
    ) -> Result<Self, ValidationError> {
        let probability_a = unit("probability_a", probability_a)?;
        let probability_b = unit("probability_b", probability_b)?;
        let sum = probability_a + probability_b;
        if (sum - 1.0).abs() > Self::PROBABILITY_TOLERANCE {
            return Err(ValidationError::out_of_range(
                "probability_sum",
                1.0,
                1.0,
                sum,
            ));
        }
        if evidence_ids.len() > MAX_CONTRIBUTIONS {
            return Err(ValidationError::out_of_range(
                "evidence_ids",
                0.0,
                MAX_CONTRIBUTIONS as f64,
                evidence_ids.len() as f64,
            ));
        }
        for (axis, value) in &value_alignment {
            unit(&format!("value_alignment.{}", axis.key()), *value)?;
        }
        Ok(Self {
            probability_a,
            probability_b,
            regret_risk_a: unit("regret_risk_a", regret_risk_a)?,
            regret_risk_b: unit("regret_risk_b", regret_risk_b)?,
            evidence_ids,
            value_alignment,
            breakdown,
        })
    }

    pub fn probability_a(&self) -> f64 {
        self.probability_a
    }

    pub fn probability_b(&self) -> f64 {
        self.probability_b
    }

    pub fn regret_risk_a(&self) -> f64 {
        self.regret_risk_a
    }

    pub fn regret_risk_b(&self) -> f64 {
        self.regret_risk_b
    }

    pub fn evidence_ids(&self) -> &[FragmentId] {
        &self.evidence_ids
    }

    pub fn value_alignment(&self) -> &BTreeMap<ValueAxis, f64> {
        &self.value_alignment
    }

    pub fn breakdown(&self) -> Option<&CalculationBreakdown> {
        self.breakdown.as_ref()
    }
}

#[derive(Deserialize)]
struct DecisionResultRaw {
    probability_a: f64,
    probability_b: f64,
    regret_risk_a: f64,
    regret_risk_b: f64,
    evidence_ids: Vec<FragmentId>,
    value_alignment: BTreeMap<ValueAxis, f64>,
    #[serde(default)]
    breakdown: Option<CalculationBreakdown>,
}

impl TryFrom<DecisionResultRaw> for DecisionResult {
    type Error = ValidationError;

    fn try_from(raw: DecisionResultRaw) -> Result<Self, Self::Error> {
        Self::new(
            raw.probability_a,
            raw.probability_b,
            raw.regret_risk_a,
            raw.regret_risk_b,
            raw.evidence_ids,
            raw.value_alignment,
            raw.breakdown,
        )
    }
}
