//! In-Memory Evidence Store Adapter
//!
//! Brute-force cosine search over each user's fragments. Useful for tests
//! and small deployments; a production store would use a vector index.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, FragmentId, UserId};
use crate::domain::projection::{cosine_similarity, Embedding, EvidenceItem, ThoughtFragment};
use crate::ports::EvidenceStore;

#[derive(Debug, Clone)]
struct StoredFragment {
    fragment: ThoughtFragment,
    deleted: bool,
}

/// In-memory evidence store.
#[derive(Debug, Clone)]
pub struct InMemoryEvidenceStore {
    fragments: Arc<RwLock<HashMap<UserId, Vec<StoredFragment>>>>,
    min_similarity: f64,
}

impl InMemoryEvidenceStore {
    /// Creates an empty store returning fragments with similarity of at
    /// least `min_similarity` (clamped to [0, 1]).
    pub fn new(min_similarity: f64) -> Self {
        Self {
            fragments: Arc::new(RwLock::new(HashMap::new())),
            min_similarity: min_similarity.clamp(0.0, 1.0),
        }
    }

    /// Adds a fragment for a user.
    pub async fn add_fragment(&self, user_id: &UserId, fragment: ThoughtFragment) {
        self.fragments
            .write()
            .await
            .entry(user_id.clone())
            .or_default()
            .push(StoredFragment {
                fragment,
                deleted: false,
            });
    }

    /// Soft-deletes a fragment. Returns false if it was not found.
    pub async fn delete_fragment(&self, user_id: &UserId, fragment_id: FragmentId) -> bool {
        let mut fragments = self.fragments.write().await;
        match fragments
            .get_mut(user_id)
            .and_then(|list| list.iter_mut().find(|s| s.fragment.id() == fragment_id))
        {
            Some(stored) => {
                stored.deleted = true;
                true
            }
            None => false,
        }
    }

    /// Number of non-deleted fragments stored for a user.
    pub async fn fragment_count(&self, user_id: &UserId) -> usize {
        self.fragments
            .read()
            .await
            .get(user_id)
            .map(|list| list.iter().filter(|s| !s.deleted).count())
            .unwrap_or(0)
    }
}

impl Default for InMemoryEvidenceStore {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[async_trait]
impl EvidenceStore for InMemoryEvidenceStore {
    async fn find_similar(
        &self,
        user_id: &UserId,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<EvidenceItem>, DomainError> {
        let fragments = self.fragments.read().await;
        let Some(list) = fragments.get(user_id) else {
            return Ok(Vec::new());
        };

        let mut scored = Vec::new();
        for stored in list.iter().filter(|s| !s.deleted) {
            let similarity = cosine_similarity(query, stored.fragment.embedding())?;
            if similarity >= self.min_similarity && similarity >= 0.0 {
                scored.push((similarity, &stored.fragment));
            }
        }
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(similarity, fragment)| {
                EvidenceItem::new(fragment.clone(), similarity).map_err(DomainError::from)
            })
            .collect()
    }
}
