//! Embedding provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Embedding provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    /// Which provider to use
    #[serde(default)]
    pub provider: EmbeddingProviderKind,

    /// API key (required for OpenAI)
    pub api_key: Option<Secret<String>>,

    /// Embedding model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Dimension of every embedding
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Timeout for one embedding batch, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Embedding provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    #[default]
    Mock,
    OpenAI,
}

impl EmbeddingConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Validate embedding configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dimension == 0 {
            return Err(ValidationError::InvalidDimension);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.provider == EmbeddingProviderKind::OpenAI {
            if !self.has_api_key() {
                return Err(ValidationError::MissingRequired("EMBEDDING__API_KEY"));
            }
            if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
                return Err(ValidationError::InvalidBaseUrl);
            }
            if self.model.trim().is_empty() {
                return Err(ValidationError::MissingRequired("EMBEDDING__MODEL"));
            }
        }
        Ok(())
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            dimension: default_dimension(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_dimension() -> usize {
    1536
}

fn default_timeout() -> u64 {
    30
}
