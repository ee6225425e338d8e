//! RecordFeedbackHandler - Command handler for outcome feedback.
//!
//! Persists the feedback, recomputes the user's regret rate and lets the
//! [`FeedbackLearner`] nudge lambda. The settings write uses optimistic
//! versioning: on a conflict the handler re-reads the latest settings and
//! evaluates again, so concurrent submissions never lose an update.

use std::sync::Arc;

use crate::config::LearningConfig;
use crate::domain::feedback::{
    FeedbackLearner, FeedbackOutcome, FeedbackRecord, LambdaAdjustment, UserAdaptiveSettings,
};
use crate::domain::foundation::{
    CommandMetadata, DecisionId, DomainError, FeedbackId, ValidationError,
};
use crate::ports::{AdaptiveSettingsStore, FeedbackStore};

const DEFAULT_MAX_SAVE_ATTEMPTS: u32 = 3;

/// Command to record how a past decision turned out.
#[derive(Debug, Clone)]
pub struct RecordFeedbackCommand {
    /// Decision the feedback refers to.
    pub decision_id: DecisionId,
    /// Reported outcome.
    pub outcome: FeedbackOutcome,
    /// Optional free-text note.
    pub note: Option<String>,
}

/// Result of recording feedback.
#[derive(Debug, Clone)]
pub struct RecordFeedbackResult {
    /// Identifier of the stored feedback.
    pub feedback_id: FeedbackId,
    /// Cumulative regret rate including this feedback.
    pub regret_rate: f64,
    /// What the learner did to lambda.
    pub adjustment: LambdaAdjustment,
    /// Settings as stored after this feedback.
    pub settings: UserAdaptiveSettings,
}

/// Error type for feedback recording.
#[derive(Debug, thiserror::Error)]
pub enum RecordFeedbackError {
    /// Invalid feedback (e.g. note too long).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A store failed.
    #[error(transparent)]
    Store(#[from] DomainError),

    /// Every save attempt lost to a concurrent writer.
    #[error("settings update conflicted {attempts} times")]
    ConflictRetriesExhausted { attempts: u32 },
}

/// Handler for recording feedback.
pub struct RecordFeedbackHandler {
    feedback_store: Arc<dyn FeedbackStore>,
    settings_store: Arc<dyn AdaptiveSettingsStore>,
    learner: FeedbackLearner,
    max_save_attempts: u32,
}

impl RecordFeedbackHandler {
    pub fn new(
        feedback_store: Arc<dyn FeedbackStore>,
        settings_store: Arc<dyn AdaptiveSettingsStore>,
    ) -> Self {
        Self {
            feedback_store,
            settings_store,
            learner: FeedbackLearner::default(),
            max_save_attempts: DEFAULT_MAX_SAVE_ATTEMPTS,
        }
    }

    /// Applies the learning policy and attempt limit from configuration.
    pub fn with_learning_config(self, config: &LearningConfig) -> Result<Self, ValidationError> {
        Ok(self
            .with_learner(FeedbackLearner::new(config.policy()?))
            .with_max_save_attempts(config.max_save_attempts))
    }

    pub fn with_learner(mut self, learner: FeedbackLearner) -> Self {
        self.learner = learner;
        self
    }

    /// Number of read-evaluate-save rounds before giving up. At least one.
    pub fn with_max_save_attempts(mut self, attempts: u32) -> Self {
        self.max_save_attempts = attempts.max(1);
        self
    }

    pub async fn handle(
        &self,
        cmd: RecordFeedbackCommand,
        metadata: CommandMetadata,
    ) -> Result<RecordFeedbackResult, RecordFeedbackError> {
        let user_id = &metadata.user_id;

        // 1. Persist the feedback
        let record = FeedbackRecord::new(user_id.clone(), cmd.decision_id, cmd.outcome, cmd.note)?;
        self.feedback_store.record(&record).await?;

        // 2. Recompute the cumulative regret rate
        let stats = self.feedback_store.stats(user_id).await?;
        let regret_rate = stats
            .regret_rate()
            .unwrap_or_else(|| record.outcome.regret_signal());

        tracing::info!(
            user_id = %user_id,
            decision_id = %record.decision_id,
            outcome = %record.outcome,
            regret_rate,
            correlation_id = %metadata.correlation_id(),
            "feedback recorded"
        );

        // 3. Adapt lambda, re-reading on version conflicts
        for attempt in 1..=self.max_save_attempts {
            let current = self.settings_store.get_or_create(user_id).await?;
            let adjustment = self.learner.evaluate(regret_rate, current.lambda());

            if !adjustment.is_change() {
                return Ok(RecordFeedbackResult {
                    feedback_id: record.id,
                    regret_rate,
                    adjustment,
                    settings: current,
                });
            }

            match self.settings_store.save(&current.apply(adjustment)).await {
                Ok(saved) => {
                    tracing::info!(
                        user_id = %user_id,
                        lambda_from = current.lambda(),
                        lambda = saved.lambda(),
                        version = %saved.version(),
                        "lambda adjusted"
                    );
                    return Ok(RecordFeedbackResult {
                        feedback_id: record.id,
                        regret_rate,
                        adjustment,
                        settings: saved,
                    });
                }
                Err(err) if err.is_version_conflict() => {
                    tracing::warn!(
                        user_id = %user_id,
                        attempt,
                        error = %err,
                        "settings changed concurrently, retrying"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(RecordFeedbackError::ConflictRetriesExhausted {
            attempts: self.max_save_attempts,
        })
    }
}
