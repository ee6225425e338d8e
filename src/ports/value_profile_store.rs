//! ValueProfileStore port for explicit and implicit value data

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::projection::{ImplicitValueNode, ValueImportance};

/// Read access to a user's value profile.
#[async_trait]
pub trait ValueProfileStore: Send + Sync {
    /// Explicit importance ratings. Unrated axes fall back to 0.5.
    async fn importance(&self, user_id: &UserId) -> Result<ValueImportance, DomainError>;

    /// Implicit value nodes inferred from the user's fragments.
    async fn implicit_nodes(&self, user_id: &UserId)
        -> Result<Vec<ImplicitValueNode>, DomainError>;
}
