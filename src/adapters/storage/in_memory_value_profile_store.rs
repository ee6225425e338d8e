//! In-Memory Value Profile Store Adapter

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::projection::{ImplicitValueNode, ValueImportance};
use crate::ports::ValueProfileStore;

/// In-memory explicit importance ratings and implicit value nodes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryValueProfileStore {
    importance: Arc<RwLock<HashMap<UserId, ValueImportance>>>,
    implicit: Arc<RwLock<HashMap<UserId, Vec<ImplicitValueNode>>>>,
}

impl InMemoryValueProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a user's explicit ratings.
    pub async fn set_importance(&self, user_id: &UserId, importance: ValueImportance) {
        self.importance
            .write()
            .await
            .insert(user_id.clone(), importance);
    }

    /// Replaces a user's implicit nodes.
    pub async fn set_implicit_nodes(&self, user_id: &UserId, nodes: Vec<ImplicitValueNode>) {
        self.implicit.write().await.insert(user_id.clone(), nodes);
    }
}

#[async_trait]
impl ValueProfileStore for InMemoryValueProfileStore {
    async fn importance(&self, user_id: &UserId) -> Result<ValueImportance, DomainError> {
        Ok(self
            .importance
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn implicit_nodes(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ImplicitValueNode>, DomainError> {
        Ok(self
            .implicit
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::projection::ValueAxis;

    #[tokio::test]
    async fn unknown_user_gets_defaults() {
        let store = InMemoryValueProfileStore::new();
        let user = UserId::new("nobody").unwrap();
        let importance = store.importance(&user).await.unwrap();
        assert_eq!(importance.importance(ValueAxis::Health), 0.5);
        assert!(store.implicit_nodes(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stores_profile_per_user() {
        let store = InMemoryValueProfileStore::new();
        let user = UserId::new("u").unwrap();
        store
            .set_importance(
                &user,
                ValueImportance::new().with_rating(ValueAxis::Growth, 0.9).unwrap(),
            )
            .await;
        store
            .set_implicit_nodes(
                &user,
                vec![ImplicitValueNode::new(ValueAxis::Growth, 4, 0.5).unwrap()],
            )
            .await;

        assert_eq!(store.importance(&user).await.unwrap().importance(ValueAxis::Growth), 0.9);
        assert_eq!(store.implicit_nodes(&user).await.unwrap().len(), 1);
    }
}
