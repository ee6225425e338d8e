//! AdaptiveSettingsStore port for per-user lambda and regret prior

use async_trait::async_trait;

use crate::domain::feedback::UserAdaptiveSettings;
use crate::domain::foundation::{DomainError, UserId};

/// Versioned persistence for [`UserAdaptiveSettings`].
///
/// Writers follow a single-writer-per-user discipline through optimistic
/// versioning: read, modify, then save with the version that was read.
#[async_trait]
pub trait AdaptiveSettingsStore: Send + Sync {
    /// Returns the stored settings, creating defaults on first access.
    async fn get_or_create(&self, user_id: &UserId) -> Result<UserAdaptiveSettings, DomainError>;

    /// Saves `settings` if its version matches the stored one.
    ///
    /// Returns the stored record with its version incremented.
    ///
    /// # Errors
    ///
    /// - `VersionConflict` if another writer saved first
    /// - `SettingsNotFound` if nothing is stored for the user
    async fn save(
        &self,
        settings: &UserAdaptiveSettings,
    ) -> Result<UserAdaptiveSettings, DomainError>;
}
