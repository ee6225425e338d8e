//! OpenAI Embedding Provider - Implementation of EmbeddingProvider for
//! OpenAI's `/embeddings` endpoint.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIEmbeddingConfig::new(api_key)
//!     .with_model("text-embedding-3-small")
//!     .with_dimension(1536);
//!
//! let provider = OpenAIEmbeddingProvider::new(config)?;
//! ```
//!
//! Failures are mapped to [`EmbeddingError`] and returned as-is. This
//! adapter never retries.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::projection::Embedding;
use crate::ports::{EmbeddingError, EmbeddingProvider, EmbeddingProviderInfo};

/// Retry-after reported when the provider gives no hint.
const DEFAULT_RETRY_AFTER_SECS: u32 = 20;

/// Configuration for the OpenAI embedding provider.
#[derive(Debug, Clone)]
pub struct OpenAIEmbeddingConfig {
    api_key: Secret<String>,
    /// Embedding model (e.g., "text-embedding-3-small").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Expected dimension of every returned vector.
    pub dimension: usize,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAIEmbeddingConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_secret(Secret::new(api_key.into()))
    }

    pub fn from_secret(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            dimension: 1536,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI embeddings client.
pub struct OpenAIEmbeddingProvider {
    config: OpenAIEmbeddingConfig,
    client: Client,
}

impl OpenAIEmbeddingProvider {
    /// Creates the provider and its HTTP client.
    pub fn new(config: OpenAIEmbeddingConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbeddingError::invalid_request(format!("HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.config.base_url.trim_end_matches('/'))
    }

    async fn send_request(&self, texts: &[String]) -> Result<Response, EmbeddingError> {
        let body = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
            encoding_format: "float",
        };

        self.client
            .post(self.embeddings_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbeddingError::timeout(self.config.timeout)
                } else if e.is_connect() {
                    EmbeddingError::network(format!("Connection failed: {}", e))
                } else {
                    EmbeddingError::network(e.to_string())
                }
            })
    }

    async fn request_embeddings(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(position) = texts.iter().position(|t| t.trim().is_empty()) {
            return Err(EmbeddingError::invalid_request(format!(
                "input {} is empty",
                position
            )));
        }

        let response = self.send_request(texts).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = map_error_status(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), error = %error, "embedding request failed");
            return Err(error);
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::parse(format!("Failed to parse response: {}", e)))?;

        tracing::debug!(
            model = %parsed.model,
            inputs = texts.len(),
            prompt_tokens = parsed.usage.as_ref().map(|u| u.prompt_tokens),
            "embeddings received"
        );

        into_embeddings(parsed, texts.len(), self.config.dimension)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut vectors = self.request_embeddings(&[text.to_string()]).await?;
        vectors.pop().ok_or(EmbeddingError::BatchSizeMismatch {
            expected: 1,
            actual: 0,
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        self.request_embeddings(texts).await
    }

    fn provider_info(&self) -> EmbeddingProviderInfo {
        EmbeddingProviderInfo::new("openai", &self.config.model, self.config.dimension)
    }
}

/// Maps a non-success HTTP status to an error kind.
fn map_error_status(status: u16, body: &str) -> EmbeddingError {
    match status {
        401 | 403 => EmbeddingError::AuthenticationFailed,
        429 if body.contains("insufficient_quota") => {
            EmbeddingError::quota_exceeded(error_message(body))
        }
        429 => EmbeddingError::rate_limited(parse_retry_after(body)),
        400 | 404 | 413 | 422 => EmbeddingError::invalid_request(error_message(body)),
        500..=599 => {
            EmbeddingError::unavailable(format!("Server error {}: {}", status, error_message(body)))
        }
        _ => EmbeddingError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

fn parse_retry_after(body: &str) -> u32 {
    let message = error_message(body);
    message
        .find("try again in ")
        .map(|idx| &message[idx + "try again in ".len()..])
        .and_then(|rest| {
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Orders by index and validates count and dimension.
fn into_embeddings(
    response: EmbeddingResponse,
    expected: usize,
    dimension: usize,
) -> Result<Vec<Embedding>, EmbeddingError> {
    let mut data = response.data;
    if data.len() != expected {
        return Err(EmbeddingError::BatchSizeMismatch {
            expected,
            actual: data.len(),
        });
    }
    data.sort_by_key(|d| d.index);

    data.into_iter()
        .map(|d| {
            if d.embedding.len() != dimension {
                return Err(EmbeddingError::parse(format!(
                    "expected dimension {}, got {}",
                    dimension,
                    d.embedding.len()
                )));
            }
            Embedding::new(d.embedding).map_err(|e| EmbeddingError::parse(e.to_string()))
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    encoding_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    model: String,
    usage: Option<EmbeddingUsage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingUsage {
    prompt_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: serde_json::Value) -> EmbeddingResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = OpenAIEmbeddingConfig::new("sk-test");
        assert_eq!(config.model, "text-embedding-3-small");
        assert_eq!(config.dimension, 1536);
        assert_eq!(config.api_key(), "sk-test");
    }

    #[test]
    fn config_debug_hides_key() {
        let config = OpenAIEmbeddingConfig::new("sk-very-secret");
        assert!(!format!("{:?}", config).contains("sk-very-secret"));
    }

    #[test]
    fn url_tolerates_trailing_slash() {
        let provider = OpenAIEmbeddingProvider::new(
            OpenAIEmbeddingConfig::new("k").with_base_url("http://localhost:9/v1/"),
        )
        .unwrap();
        assert_eq!(provider.embeddings_url(), "http://localhost:9/v1/embeddings");
    }

    #[test]
    fn quota_429_maps_to_quota_exceeded() {
        let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","code":"insufficient_quota"}}"#;
        let error = map_error_status(429, body);
        assert_eq!(
            error,
            EmbeddingError::quota_exceeded("You exceeded your current quota")
        );
        assert!(!error.is_retryable());
    }

    #[test]
    fn plain_429_maps_to_rate_limited_with_hint() {
        let body = r#"{"error":{"message":"Rate limit reached. Please try again in 7s.","type":"requests"}}"#;
        assert_eq!(map_error_status(429, body), EmbeddingError::rate_limited(7));
    }

    #[test]
    fn plain_429_without_hint_uses_default() {
        assert_eq!(
            map_error_status(429, "slow down"),
            EmbeddingError::rate_limited(DEFAULT_RETRY_AFTER_SECS)
        );
    }

    #[test]
    fn auth_and_server_errors_map() {
        assert_eq!(map_error_status(401, ""), EmbeddingError::AuthenticationFailed);
        assert!(matches!(
            map_error_status(503, "busy"),
            EmbeddingError::Unavailable { .. }
        ));
        assert!(matches!(
            map_error_status(400, r#"{"error":{"message":"bad input"}}"#),
            EmbeddingError::InvalidRequest(m) if m == "bad input"
        ));
    }

    #[test]
    fn embeddings_are_reordered_by_index() {
        let parsed = response(serde_json::json!({
            "data": [
                {"embedding": [0.0, 1.0], "index": 1},
                {"embedding": [1.0, 0.0], "index": 0}
            ],
            "model": "text-embedding-3-small",
            "usage": {"prompt_tokens": 4, "total_tokens": 4}
        }));
        let vectors = into_embeddings(parsed, 2, 2).unwrap();
        assert_eq!(vectors[0].as_slice(), &[1.0, 0.0]);
        assert_eq!(vectors[1].as_slice(), &[0.0, 1.0]);
    }

    #[test]
    fn missing_embeddings_are_rejected() {
        let parsed = response(serde_json::json!({
            "data": [{"embedding": [1.0, 0.0], "index": 0}],
            "model": "m"
        }));
        assert_eq!(
            into_embeddings(parsed, 3, 2).unwrap_err(),
            EmbeddingError::BatchSizeMismatch {
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn wrong_dimension_is_rejected() {
        let parsed = response(serde_json::json!({
            "data": [{"embedding": [1.0, 0.0, 0.0], "index": 0}],
            "model": "m"
        }));
        assert!(matches!(
            into_embeddings(parsed, 1, 2),
            Err(EmbeddingError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn empty_input_is_rejected_before_sending() {
        let provider = OpenAIEmbeddingProvider::new(OpenAIEmbeddingConfig::new("k")).unwrap();
        let result = provider
            .embed_batch(&["ok".to_string(), "  ".to_string()])
            .await;
        assert!(matches!(result, Err(EmbeddingError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn empty_batch_makes_no_request() {
        let provider = OpenAIEmbeddingProvider::new(OpenAIEmbeddingConfig::new("k")).unwrap();
        assert!(provider.embed_batch(&[]).await.unwrap().is_empty());
    }
}
