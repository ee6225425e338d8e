//! Projection module - The decision projection engine.
//!
//! Turns two option embeddings, similar past fragments, the user's value
//! profile and adaptive parameters into a reproducible [`DecisionResult`].
//!
//! # Pipeline
//!
//! ```text
//! vector ──► fit_scorer ─────────┐
//!        ├─► regret_estimator ───┼─► compositor ──► DecisionResult
//!        └─► value_alignment ────┘    (softmax)
//! ```
//!
//! Everything here is pure and synchronous. Embedding generation and
//! evidence retrieval happen in the application layer before
//! [`DecisionProjector::project`] is called.
//!
//! The engine describes; it never recommends. Value alignment in
//! particular is reported per axis and never feeds the probabilities.

mod breakdown;
mod compositor;
mod evidence;
mod fit_scorer;
mod projector;
mod regret_estimator;
mod value_alignment;
mod value_axis;
mod vector;

pub use breakdown::{
    CalculationBreakdown, CalculationParameters, DecisionResult, FitBreakdown,
    FragmentContribution, RegretBreakdown, ScoreBreakdown, ScoringWeights, MAX_CONTRIBUTIONS,
    SCORE_FORMULA,
};
pub use compositor::ScoreCompositor;
pub use evidence::{EvidenceItem, ThoughtFragment, SUMMARY_MAX_CHARS};
pub use fit_scorer::{FitScorer, PriorityAxis};
pub use projector::{DecisionProjector, ProjectionInput};
pub use regret_estimator::{RegretEstimator, NEUTRAL_NEGATIVITY, NO_EVIDENCE_VARIANCE};
pub use value_alignment::{
    AxisEmbeddings, ValueAlignmentCalculator, MAX_AMPLIFIED_MAGNITUDE, MAX_BASE_DIFF,
    MAX_IMPORTANCE,
};
pub use value_axis::{ImplicitValueNode, ValueAxis, ValueImportance, DEFAULT_IMPORTANCE};
pub use vector::{cosine_similarity, dot_product, Embedding};
