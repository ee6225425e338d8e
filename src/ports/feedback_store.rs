//! FeedbackStore port for outcome feedback

use async_trait::async_trait;

use crate::domain::feedback::{FeedbackRecord, FeedbackStats};
use crate::domain::foundation::{DomainError, UserId};

/// Append-only feedback persistence with per-user statistics.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Stores a new feedback record.
    async fn record(&self, feedback: &FeedbackRecord) -> Result<(), DomainError>;

    /// Counts of every outcome the user has reported so far.
    async fn stats(&self, user_id: &UserId) -> Result<FeedbackStats, DomainError>;
}
