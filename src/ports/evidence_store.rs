//! EvidenceStore port for nearest-neighbour fragment retrieval

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::projection::{Embedding, EvidenceItem};

/// Finds a user's past fragments most similar to a query vector.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Top `top_k` non-deleted fragments for `user_id`, most similar first.
    ///
    /// Similarities are in [0, 1]; fragments whose raw cosine is negative
    /// are never returned.
    async fn find_similar(
        &self,
        user_id: &UserId,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<EvidenceItem>, DomainError>;
}
