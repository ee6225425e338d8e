//! Embedding Provider Port - text to fixed-dimension vector.
//!
//! The projection pipeline never generates embeddings itself. Handlers call
//! this port once per decision and treat the result as all-or-nothing: a
//! failed, partial or timed-out batch aborts the decision.
//!
//! Implementations must not retry. Retry and backoff belong to whoever
//! calls the handler; [`EmbeddingError::is_retryable`] tells them when it
//! is worth trying.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::projection::Embedding;

/// Port for embedding generation.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds a single text.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Embeds many texts in one request.
    ///
    /// Returns exactly one embedding per input, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError>;

    /// Provider information (name, model, dimension).
    fn provider_info(&self) -> EmbeddingProviderInfo;
}

/// Provider information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingProviderInfo {
    /// Provider name (e.g., "openai", "mock").
    pub name: String,
    /// Model identifier.
    pub model: String,
    /// Dimension of every returned embedding.
    pub dimension: usize,
}

impl EmbeddingProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            dimension,
        }
    }
}

/// Embedding provider errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmbeddingError {
    /// Account quota or billing limit exhausted.
    #[error("embedding quota exceeded: {message}")]
    QuotaExceeded { message: String },

    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse or validate the provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request (empty text, too many inputs).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Provider returned a different number of embeddings than requested.
    #[error("expected {expected} embeddings, got {actual}")]
    BatchSizeMismatch { expected: usize, actual: usize },
}

impl EmbeddingError {
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::QuotaExceeded {
            message: message.into(),
        }
    }

    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn timeout(after: Duration) -> Self {
        Self::Timeout {
            timeout_ms: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Returns true if the caller may retry later.
    ///
    /// Quota exhaustion is not retryable: it needs a billing change, not time.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EmbeddingError::RateLimited { .. }
                | EmbeddingError::Unavailable { .. }
                | EmbeddingError::Network(_)
                | EmbeddingError::Timeout { .. }
        )
    }
}
