//! Embedding Provider Adapters.
//!
//! ## Available Adapters
//!
//! - `MockEmbeddingProvider` - Deterministic token-hashing mock for testing
//! - `OpenAIEmbeddingProvider` - OpenAI `/embeddings` endpoint
//!
//! [`create_provider`] picks one from [`EmbeddingConfig`].

mod mock_provider;
mod openai_provider;

pub use mock_provider::MockEmbeddingProvider;
pub use openai_provider::{OpenAIEmbeddingConfig, OpenAIEmbeddingProvider};

use std::sync::Arc;

use crate::config::{EmbeddingConfig, EmbeddingProviderKind};
use crate::ports::{EmbeddingError, EmbeddingProvider};

/// Builds the embedding provider selected by configuration.
///
/// # Errors
///
/// Returns `AuthenticationFailed` when OpenAI is selected without an API
/// key, or any error from constructing the HTTP client.
pub fn create_provider(
    config: &EmbeddingConfig,
) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
    match config.provider {
        EmbeddingProviderKind::Mock => {
            tracing::info!(dimension = config.dimension, "using mock embedding provider");
            Ok(Arc::new(MockEmbeddingProvider::new(config.dimension)))
        }
        EmbeddingProviderKind::OpenAI => {
            let api_key = config
                .api_key
                .clone()
                .ok_or(EmbeddingError::AuthenticationFailed)?;
            let provider = OpenAIEmbeddingProvider::new(
                OpenAIEmbeddingConfig::from_secret(api_key)
                    .with_model(config.model.clone())
                    .with_base_url(config.base_url.clone())
                    .with_dimension(config.dimension)
                    .with_timeout(config.timeout()),
            )?;
            tracing::info!(model = %config.model, "using OpenAI embedding provider");
            Ok(Arc::new(provider))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    #[test]
    fn default_config_builds_mock() {
        let config = EmbeddingConfig {
            dimension: 8,
            ..Default::default()
        };
        let provider = create_provider(&config).unwrap();
        let info = provider.provider_info();
        assert_eq!(info.name, "mock");
        assert_eq!(info.dimension, 8);
    }

    #[test]
    fn openai_without_key_is_rejected() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderKind::OpenAI,
            ..Default::default()
        };
        assert!(matches!(
            create_provider(&config),
            Err(EmbeddingError::AuthenticationFailed)
        ));
    }

    #[test]
    fn openai_with_key_uses_configured_model() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderKind::OpenAI,
            api_key: Some(Secret::new("sk-test".to_string())),
            model: "text-embedding-3-large".to_string(),
            dimension: 3072,
            ..Default::default()
        };
        let info = create_provider(&config).unwrap().provider_info();
        assert_eq!(info.name, "openai");
        assert_eq!(info.model, "text-embedding-3-large");
        assert_eq!(info.dimension, 3072);
    }
}
