//! Command infrastructure for application handlers.
//!
//! `CommandMetadata` carries the caller's identity and correlation context
//! through a handler so that every log line for one request can be joined.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The user executing this command.
    pub user_id: UserId,

    /// Links related operations across a single caller request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g., "api", "scheduler").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata with required user ID.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            correlation_id: None,
            source: None,
        }
    }

    /// Sets the correlation ID.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Sets the command source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if absent.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the command source, if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[test]
    fn keeps_explicit_correlation_id() {
        let meta = CommandMetadata::new(test_user()).with_correlation_id("corr-42");
        assert_eq!(meta.correlation_id(), "corr-42");
    }

    #[test]
    fn generates_correlation_id_when_absent() {
        let meta = CommandMetadata::new(test_user());
        assert!(Uuid::parse_str(&meta.correlation_id()).is_ok());
    }

    #[test]
    fn omits_empty_optionals_when_serialized() {
        let meta = CommandMetadata::new(test_user()).with_source("api");
        let json = serde_json::to_value(&meta).unwrap();
        assert!(json.get("correlation_id").is_none());
        assert_eq!(json["source"], "api");
    }
}
