//! In-Memory Feedback Store Adapter

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::feedback::{FeedbackRecord, FeedbackStats};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::FeedbackStore;

/// Append-only in-memory feedback log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeedbackStore {
    records: Arc<RwLock<HashMap<UserId, Vec<FeedbackRecord>>>>,
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All feedback for a user, oldest first.
    pub async fn records_for(&self, user_id: &UserId) -> Vec<FeedbackRecord> {
        self.records
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn record(&self, feedback: &FeedbackRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        let list = records.entry(feedback.user_id.clone()).or_default();
        if list.iter().any(|r| r.id == feedback.id) {
            return Err(DomainError::new(
                ErrorCode::StoreError,
                format!("Feedback {} already recorded", feedback.id),
            ));
        }
        list.push(feedback.clone());
        Ok(())
    }

    async fn stats(&self, user_id: &UserId) -> Result<FeedbackStats, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .get(user_id)
            .map(|list| FeedbackStats::from_outcomes(list.iter().map(|r| &r.outcome)))
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feedback::FeedbackOutcome;
    use crate::domain::foundation::DecisionId;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn feedback(outcome: FeedbackOutcome) -> FeedbackRecord {
        FeedbackRecord::new(user(), DecisionId::new(), outcome, None).unwrap()
    }

    #[tokio::test]
    async fn stats_count_each_outcome() {
        let store = InMemoryFeedbackStore::new();
        store.record(&feedback(FeedbackOutcome::Regret)).await.unwrap();
        store.record(&feedback(FeedbackOutcome::NoRegret)).await.unwrap();
        store.record(&feedback(FeedbackOutcome::PartialRegret)).await.unwrap();

        let stats = store.stats(&user()).await.unwrap();
        assert_eq!(stats, FeedbackStats::new(1, 1, 1));
        assert_eq!(store.records_for(&user()).await.len(), 3);
    }

    #[tokio::test]
    async fn unknown_user_has_empty_stats() {
        let store = InMemoryFeedbackStore::new();
        assert!(store.stats(&user()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = InMemoryFeedbackStore::new();
        let record = feedback(FeedbackOutcome::Regret);
        store.record(&record).await.unwrap();
        assert!(store.record(&record).await.is_err());
    }
}
