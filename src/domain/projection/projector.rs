//! Decision Projector - runs the full scoring pipeline for one decision.
//!
//! Pure and synchronous. All embeddings, evidence, value profile data and
//! feedback statistics arrive already fetched in a [`ProjectionInput`]; the
//! per-user parameters arrive in [`CalculationParameters`]. Two calls with
//! the same inputs produce the same [`DecisionResult`].

use crate::domain::feedback::FeedbackStats;
use crate::domain::foundation::ValidationError;

use super::breakdown::{CalculationBreakdown, CalculationParameters, DecisionResult};
use super::compositor::ScoreCompositor;
use super::evidence::EvidenceItem;
use super::fit_scorer::{FitScorer, PriorityAxis};
use super::regret_estimator::RegretEstimator;
use super::value_alignment::{AxisEmbeddings, ValueAlignmentCalculator};
use super::value_axis::{ImplicitValueNode, ValueAxis, ValueImportance};
use super::vector::Embedding;

/// Everything one projection reads, with dimensions checked up front.
#[derive(Debug, Clone)]
pub struct ProjectionInput {
    option_a: Embedding,
    option_b: Embedding,
    axis_embeddings: AxisEmbeddings,
    evidence: Vec<EvidenceItem>,
    priority_axis: Option<ValueAxis>,
    importance: ValueImportance,
    implicit_nodes: Vec<ImplicitValueNode>,
    feedback: FeedbackStats,
}

impl ProjectionInput {
    /// Creates an input with no evidence, default importance and no
    /// feedback.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the options and axis embeddings disagree.
    pub fn new(
        option_a: Embedding,
        option_b: Embedding,
        axis_embeddings: AxisEmbeddings,
    ) -> Result<Self, ValidationError> {
        let dimension = option_a.dimension();
        for actual in [option_b.dimension(), axis_embeddings.dimension()] {
            if actual != dimension {
                return Err(ValidationError::dimension_mismatch(dimension, actual));
            }
        }
        Ok(Self {
            option_a,
            option_b,
            axis_embeddings,
            evidence: Vec::new(),
            priority_axis: None,
            importance: ValueImportance::new(),
            implicit_nodes: Vec::new(),
            feedback: FeedbackStats::default(),
        })
    }

    /// Attaches evidence; every fragment must match the option dimension.
    pub fn with_evidence(mut self, evidence: Vec<EvidenceItem>) -> Result<Self, ValidationError> {
        let dimension = self.option_a.dimension();
        if let Some(bad) = evidence
            .iter()
            .find(|item| item.embedding().dimension() != dimension)
        {
            return Err(ValidationError::dimension_mismatch(
                dimension,
                bad.embedding().dimension(),
            ));
        }
        self.evidence = evidence;
        Ok(self)
    }

    pub fn with_priority_axis(mut self, axis: Option<ValueAxis>) -> Self {
        self.priority_axis = axis;
        self
    }

    pub fn with_value_profile(
        mut self,
        importance: ValueImportance,
        implicit_nodes: Vec<ImplicitValueNode>,
    ) -> Self {
        self.importance = importance;
        self.implicit_nodes = implicit_nodes;
        self
    }

    pub fn with_feedback(mut self, feedback: FeedbackStats) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn option_a(&self) -> &Embedding {
        &self.option_a
    }

    pub fn option_b(&self) -> &Embedding {
        &self.option_b
    }

    pub fn evidence(&self) -> &[EvidenceItem] {
        &self.evidence
    }

    pub fn priority_axis(&self) -> Option<ValueAxis> {
        self.priority_axis
    }

    pub fn feedback(&self) -> &FeedbackStats {
        &self.feedback
    }
}

/// Composes the fit, regret, alignment and probability stages.
#[derive(Debug, Clone, Copy)]
pub struct DecisionProjector {
    parameters: CalculationParameters,
}

impl DecisionProjector {
    pub fn new(parameters: CalculationParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &CalculationParameters {
        &self.parameters
    }

    /// Projects a decision.
    ///
    /// `evidence_ids` on the result are the fragments behind the retained
    /// contributions, strongest first.
    pub fn project(
        &self,
        input: &ProjectionInput,
        include_breakdown: bool,
    ) -> Result<DecisionResult, ValidationError> {
        let params = &self.parameters;
        let priority = input.priority_axis.map(|axis| PriorityAxis {
            axis,
            embedding: input.axis_embeddings.get(axis).clone(),
        });

        let fit = FitScorer::new(params.priority_axis_boost()).score(
            &input.option_a,
            &input.option_b,
            &input.evidence,
            priority.as_ref(),
        )?;

        let regret = RegretEstimator::new(params.volatility_weight(), params.negativity_weight())
            .estimate(
                &input.feedback,
                params.regret_prior(),
                &input.evidence,
                &input.option_a,
                &input.option_b,
            )?;

        let value_alignment = ValueAlignmentCalculator::calculate(
            &input.option_a,
            &input.option_b,
            &input.axis_embeddings,
            &input.importance,
            &input.implicit_nodes,
        )?;

        let score = ScoreCompositor::compose(
            fit.fit_score_a(),
            fit.fit_score_b(),
            regret.regret_risk_a(),
            regret.regret_risk_b(),
            params.lambda(),
        )?;
        let (probability_a, probability_b) =
            ScoreCompositor::probabilities(score.score_a(), score.score_b());

        tracing::debug!(
            probability_a,
            probability_b,
            lambda = params.lambda(),
            evidence = input.evidence.len(),
            "decision projected"
        );

        let evidence_ids = fit.contributions().iter().map(|c| c.fragment_id).collect();
        let regret_risk_a = regret.regret_risk_a();
        let regret_risk_b = regret.regret_risk_b();
        let breakdown = include_breakdown.then(|| CalculationBreakdown {
            fit,
            regret,
            parameters: *params,
            score,
        });

        DecisionResult::new(
            probability_a,
            probability_b,
            regret_risk_a,
            regret_risk_b,
            evidence_ids,
            value_alignment,
            breakdown,
        )
    }
}
