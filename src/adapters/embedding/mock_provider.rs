//! Mock Embedding Provider for testing.
//!
//! Produces deterministic embeddings without calling a real API, so
//! pipeline tests are reproducible.
//!
//! # Features
//!
//! - Token hashing: texts sharing words get similar vectors
//! - Per-text overrides for hand-placed vectors
//! - Error injection (queued, consumed one per call)
//! - Simulated delays for timeout testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockEmbeddingProvider::new(8)
//!     .with_override("take the job", vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
//!     .with_error(EmbeddingError::rate_limited(30));
//!
//! assert!(provider.embed("anything").await.is_err());
//! let v = provider.embed("take the job").await?;
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::projection::Embedding;
use crate::ports::{EmbeddingError, EmbeddingProvider, EmbeddingProviderInfo};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Mock embedding provider for testing.
#[derive(Debug, Clone)]
pub struct MockEmbeddingProvider {
    dimension: usize,
    overrides: Arc<Mutex<HashMap<String, Vec<f32>>>>,
    errors: Arc<Mutex<VecDeque<EmbeddingError>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockEmbeddingProvider {
    /// Creates a mock producing vectors of `dimension` components.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            overrides: Arc::new(Mutex::new(HashMap::new())),
            errors: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns `vector` whenever exactly `text` is embedded.
    pub fn with_override(self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.overrides.lock().unwrap().insert(text.into(), vector);
        self
    }

    /// Queues an error for the next call.
    pub fn with_error(self, error: EmbeddingError) -> Self {
        self.errors.lock().unwrap().push_back(error);
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of requests made (a batch counts once).
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Texts of every request, in call order.
    pub fn get_calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Deterministic bag-of-words vector for `text`.
    ///
    /// Each lowercase alphanumeric token adds +1 or -1 to one hashed
    /// component. A text with no tokens maps to the zero vector.
    pub fn hash_embedding(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = fnv1a(&token.to_lowercase());
            let index = (hash % self.dimension as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[index] += sign;
        }
        vector
    }

    async fn begin_call(&self, texts: Vec<String>) -> Result<(), EmbeddingError> {
        self.calls.lock().unwrap().push(texts);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        match self.errors.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn vector_for(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let values = self
            .overrides
            .lock()
            .unwrap()
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.hash_embedding(text));
        Embedding::new(values).map_err(|e| EmbeddingError::parse(e.to_string()))
    }
}

fn fnv1a(text: &str) -> u64 {
    text.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.begin_call(vec![text.to_string()]).await?;
        self.vector_for(text)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        self.begin_call(texts.to_vec()).await?;
        texts.iter().map(|t| self.vector_for(t)).collect()
    }

    fn provider_info(&self) -> EmbeddingProviderInfo {
        EmbeddingProviderInfo::new("mock", "mock-embedding-1", self.dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::projection::cosine_similarity;

    #[tokio::test]
    async fn same_text_gives_same_vector() {
        let provider = MockEmbeddingProvider::new(32);
        let a = provider.embed("Move to Berlin").await.unwrap();
        let b = provider.embed("move to berlin").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dimension(), 32);
    }

    #[tokio::test]
    async fn shared_words_raise_similarity() {
        let provider = MockEmbeddingProvider::new(64);
        let base = provider.embed("accept the startup job offer").await.unwrap();
        let near = provider.embed("the startup job").await.unwrap();
        let far = provider.embed("stay home with family").await.unwrap();
        let near_sim = cosine_similarity(&base, &near).unwrap();
        let far_sim = cosine_similarity(&base, &far).unwrap();
        assert!(near_sim > far_sim);
    }

    #[tokio::test]
    async fn override_wins_over_hashing() {
        let provider = MockEmbeddingProvider::new(3).with_override("anchor", vec![0.0, 0.0, 1.0]);
        let v = provider.embed("anchor").await.unwrap();
        assert_eq!(v.as_slice(), &[0.0, 0.0, 1.0]);
    }

    #[tokio::test]
    async fn batch_preserves_order_and_count() {
        let provider = MockEmbeddingProvider::new(4)
            .with_override("one", vec![1.0, 0.0, 0.0, 0.0])
            .with_override("two", vec![0.0, 1.0, 0.0, 0.0]);
        let texts = vec!["two".to_string(), "one".to_string()];
        let vectors = provider.embed_batch(&texts).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].as_slice()[1], 1.0);
        assert_eq!(vectors[1].as_slice()[0], 1.0);
    }

    #[tokio::test]
    async fn queued_errors_are_consumed_in_order() {
        let provider = MockEmbeddingProvider::new(4)
            .with_error(EmbeddingError::quota_exceeded("insufficient_quota"))
            .with_error(EmbeddingError::rate_limited(5));

        let first = provider.embed("x").await.unwrap_err();
        let second = provider.embed("x").await.unwrap_err();
        assert!(matches!(first, EmbeddingError::QuotaExceeded { .. }));
        assert!(matches!(second, EmbeddingError::RateLimited { retry_after_secs: 5 }));
        assert!(provider.embed("x").await.is_ok());
    }

    #[tokio::test]
    async fn tracks_calls() {
        let provider = MockEmbeddingProvider::new(4);
        assert_eq!(provider.call_count(), 0);

        provider.embed("a").await.unwrap();
        provider
            .embed_batch(&["b".to_string(), "c".to_string()])
            .await
            .unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.get_calls()[1], vec!["b".to_string(), "c".to_string()]);

        provider.clear_calls();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_text_maps_to_zero_vector() {
        let provider = MockEmbeddingProvider::new(4);
        let v = provider.embed("   ").await.unwrap();
        assert_eq!(v.norm(), 0.0);
    }

    #[test]
    fn reports_provider_info() {
        let info = MockEmbeddingProvider::new(16).provider_info();
        assert_eq!(info.name, "mock");
        assert_eq!(info.dimension, 16);
    }
}
