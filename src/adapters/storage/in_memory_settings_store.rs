//! In-Memory Adaptive Settings Store Adapter
//!
//! Enforces optimistic versioning the same way a database row with a
//! `version` column would: a save succeeds only against the current
//! version and bumps it.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::feedback::UserAdaptiveSettings;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::projection::CalculationParameters;
use crate::ports::AdaptiveSettingsStore;

/// In-memory versioned settings.
#[derive(Debug, Clone)]
pub struct InMemoryAdaptiveSettingsStore {
    settings: Arc<RwLock<HashMap<UserId, UserAdaptiveSettings>>>,
    default_lambda: f64,
    default_regret_prior: f64,
}

impl InMemoryAdaptiveSettingsStore {
    /// Creates a store that seeds new users with the given defaults.
    pub fn new(default_lambda: f64, default_regret_prior: f64) -> Self {
        Self {
            settings: Arc::new(RwLock::new(HashMap::new())),
            default_lambda,
            default_regret_prior,
        }
    }

    /// Current stored record, without creating one.
    pub async fn get(&self, user_id: &UserId) -> Option<UserAdaptiveSettings> {
        self.settings.read().await.get(user_id).cloned()
    }

    /// Number of users with stored settings.
    pub async fn len(&self) -> usize {
        self.settings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.settings.read().await.is_empty()
    }
}

impl Default for InMemoryAdaptiveSettingsStore {
    fn default() -> Self {
        Self::new(
            CalculationParameters::DEFAULT_LAMBDA,
            CalculationParameters::DEFAULT_REGRET_PRIOR,
        )
    }
}

#[async_trait]
impl AdaptiveSettingsStore for InMemoryAdaptiveSettingsStore {
    async fn get_or_create(&self, user_id: &UserId) -> Result<UserAdaptiveSettings, DomainError> {
        if let Some(existing) = self.settings.read().await.get(user_id) {
            return Ok(existing.clone());
        }

        let mut settings = self.settings.write().await;
        // Another task may have created it between the locks.
        if let Some(existing) = settings.get(user_id) {
            return Ok(existing.clone());
        }
        let created = UserAdaptiveSettings::with_defaults(
            user_id.clone(),
            self.default_lambda,
            self.default_regret_prior,
        )?;
        settings.insert(user_id.clone(), created.clone());
        tracing::debug!(user_id = %user_id, "adaptive settings created with defaults");
        Ok(created)
    }

    async fn save(
        &self,
        settings: &UserAdaptiveSettings,
    ) -> Result<UserAdaptiveSettings, DomainError> {
        let mut stored = self.settings.write().await;
        let current = stored.get(settings.user_id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::SettingsNotFound,
                format!("No adaptive settings for user {}", settings.user_id()),
            )
        })?;

        if current.version() != settings.version() {
            return Err(DomainError::version_conflict(
                settings.version().as_u64(),
                current.version().as_u64(),
            ));
        }

        let saved = settings.saved();
        stored.insert(saved.user_id().clone(), saved.clone());
        Ok(saved)
    }
}
