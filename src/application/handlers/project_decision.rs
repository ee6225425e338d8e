//! ProjectDecisionHandler - Command handler for projecting a binary choice.
//!
//! Gathers everything the pure pipeline needs (embeddings, evidence, value
//! profile, feedback statistics, adaptive settings), runs the
//! [`DecisionProjector`] and returns the result. Nothing is persisted.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::config::EngineConfig;
use crate::domain::feedback::SettingsVersion;
use crate::domain::foundation::{CommandMetadata, DecisionId, DomainError, ValidationError};
use crate::domain::projection::{
    AxisEmbeddings, DecisionProjector, DecisionResult, Embedding, ProjectionInput, ScoringWeights,
    ValueAxis,
};
use crate::ports::{
    AdaptiveSettingsStore, EmbeddingError, EmbeddingProvider, EvidenceStore, FeedbackStore,
    ValueProfileStore,
};

const DEFAULT_EVIDENCE_TOP_K: usize = 20;
const DEFAULT_EMBEDDING_TIMEOUT: Duration = Duration::from_secs(30);

/// Command to project a decision between two options.
#[derive(Debug, Clone)]
pub struct ProjectDecisionCommand {
    /// First option, as free text.
    pub option_a: String,
    /// Second option, as free text.
    pub option_b: String,
    /// What the decision is about. Used as the evidence query when present.
    pub context: Option<String>,
    /// Axis whose related evidence gets extra weight.
    pub priority_axis: Option<ValueAxis>,
    /// Attach the full calculation breakdown to the result.
    pub include_breakdown: bool,
}

impl ProjectDecisionCommand {
    pub fn new(option_a: impl Into<String>, option_b: impl Into<String>) -> Self {
        Self {
            option_a: option_a.into(),
            option_b: option_b.into(),
            context: None,
            priority_axis: None,
            include_breakdown: false,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_priority_axis(mut self, axis: ValueAxis) -> Self {
        self.priority_axis = Some(axis);
        self
    }

    pub fn with_breakdown(mut self) -> Self {
        self.include_breakdown = true;
        self
    }
}

/// Result of a successful projection.
#[derive(Debug, Clone)]
pub struct ProjectDecisionResult {
    /// Identifier feedback for this decision should refer to.
    pub decision_id: DecisionId,
    /// The projection itself.
    pub result: DecisionResult,
    /// Version of the adaptive settings the projection read.
    pub settings_version: SettingsVersion,
}

/// Error type for decision projection.
#[derive(Debug, thiserror::Error)]
pub enum ProjectDecisionError {
    /// Invalid command or inconsistent inputs (e.g. embedding dimensions).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The embedding provider failed. The decision was aborted.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// A store failed.
    #[error(transparent)]
    Store(#[from] DomainError),
}

/// Handler for projecting decisions.
pub struct ProjectDecisionHandler {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    evidence_store: Arc<dyn EvidenceStore>,
    value_profile_store: Arc<dyn ValueProfileStore>,
    settings_store: Arc<dyn AdaptiveSettingsStore>,
    feedback_store: Arc<dyn FeedbackStore>,
    weights: ScoringWeights,
    evidence_top_k: usize,
    embedding_timeout: Duration,
}

impl ProjectDecisionHandler {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        evidence_store: Arc<dyn EvidenceStore>,
        value_profile_store: Arc<dyn ValueProfileStore>,
        settings_store: Arc<dyn AdaptiveSettingsStore>,
        feedback_store: Arc<dyn FeedbackStore>,
    ) -> Self {
        Self {
            embedding_provider,
            evidence_store,
            value_profile_store,
            settings_store,
            feedback_store,
            weights: ScoringWeights::default(),
            evidence_top_k: DEFAULT_EVIDENCE_TOP_K,
            embedding_timeout: DEFAULT_EMBEDDING_TIMEOUT,
        }
    }

    /// Applies scoring weights and the evidence limit from configuration.
    pub fn with_engine_config(self, config: &EngineConfig) -> Result<Self, ValidationError> {
        Ok(self
            .with_weights(config.scoring_weights()?)
            .with_evidence_top_k(config.evidence_top_k))
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_evidence_top_k(mut self, top_k: usize) -> Self {
        self.evidence_top_k = top_k;
        self
    }

    /// Upper bound for the single embedding batch of a projection.
    pub fn with_embedding_timeout(mut self, embedding_timeout: Duration) -> Self {
        self.embedding_timeout = embedding_timeout;
        self
    }

    pub async fn handle(
        &self,
        cmd: ProjectDecisionCommand,
        metadata: CommandMetadata,
    ) -> Result<ProjectDecisionResult, ProjectDecisionError> {
        let user_id = &metadata.user_id;
        let decision_id = DecisionId::new();

        // 1. Validate option texts
        let option_a = required_text("option_a", &cmd.option_a)?;
        let option_b = required_text("option_b", &cmd.option_b)?;
        let context = cmd
            .context
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        // 2. Read adaptive settings (created with defaults on first use)
        let settings = self.settings_store.get_or_create(user_id).await?;

        // 3. Embed everything in one all-or-nothing batch
        let mut texts = vec![option_a.to_string(), option_b.to_string()];
        texts.extend(context.map(str::to_string));
        texts.extend(ValueAxis::ALL.iter().map(|a| a.description().to_string()));
        let batch = self.embed_all(&texts).await?;
        let batch = BatchEmbeddings::split(batch, context.is_some())?;

        // 4. Query collaborators concurrently
        let query = match &batch.context {
            Some(context) => context.clone(),
            None => batch.option_a.midpoint(&batch.option_b)?,
        };
        let (evidence, feedback, importance, implicit_nodes) = futures::try_join!(
            self.evidence_store
                .find_similar(user_id, &query, self.evidence_top_k),
            self.feedback_store.stats(user_id),
            self.value_profile_store.importance(user_id),
            self.value_profile_store.implicit_nodes(user_id),
        )?;

        tracing::debug!(
            user_id = %user_id,
            decision_id = %decision_id,
            evidence = evidence.len(),
            feedback = feedback.total(),
            "projection inputs gathered"
        );

        // 5. Run the pipeline
        let input = ProjectionInput::new(batch.option_a, batch.option_b, batch.axes)?
            .with_evidence(evidence)?
            .with_priority_axis(cmd.priority_axis)
            .with_value_profile(importance, implicit_nodes)
            .with_feedback(feedback);
        let parameters = settings.calculation_parameters(self.weights)?;
        let result = DecisionProjector::new(parameters).project(&input, cmd.include_breakdown)?;

        tracing::info!(
            user_id = %user_id,
            decision_id = %decision_id,
            correlation_id = %metadata.correlation_id(),
            lambda = settings.lambda(),
            probability_a = result.probability_a(),
            "decision projected"
        );

        Ok(ProjectDecisionResult {
            decision_id,
            result,
            settings_version: settings.version(),
        })
    }

    async fn embed_all(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let embeddings = timeout(
            self.embedding_timeout,
            self.embedding_provider.embed_batch(texts),
        )
        .await
        .map_err(|_| {
            tracing::warn!(
                timeout_ms = self.embedding_timeout.as_millis() as u64,
                "embedding batch timed out"
            );
            EmbeddingError::timeout(self.embedding_timeout)
        })??;

        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::BatchSizeMismatch {
                expected: texts.len(),
                actual: embeddings.len(),
            });
        }
        Ok(embeddings)
    }
}

fn required_text<'a>(field: &str, text: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed)
}

/// One embedding batch split back into its parts.
struct BatchEmbeddings {
    option_a: Embedding,
    option_b: Embedding,
    context: Option<Embedding>,
    axes: AxisEmbeddings,
}

impl BatchEmbeddings {
    fn split(embeddings: Vec<Embedding>, has_context: bool) -> Result<Self, ProjectDecisionError> {
        let expected = 2 + usize::from(has_context) + ValueAxis::ALL.len();
        let mismatch = EmbeddingError::BatchSizeMismatch {
            expected,
            actual: embeddings.len(),
        };
        if embeddings.len() != expected {
            return Err(mismatch.into());
        }

        let mut iter = embeddings.into_iter();
        let (Some(option_a), Some(option_b)) = (iter.next(), iter.next()) else {
            return Err(mismatch.into());
        };
        let context = if has_context { iter.next() } else { None };
        let axes = AxisEmbeddings::from_ordered(iter.collect())?;

        Ok(Self {
            option_a,
            option_b,
            context,
            axes,
        })
    }
}
