//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the projection engine to external systems:
//! - `embedding` - Embedding providers (mock, OpenAI)
//! - `storage` - In-memory stores for evidence, values, settings, feedback

pub mod embedding;
pub mod storage;

pub use embedding::{MockEmbeddingProvider, OpenAIEmbeddingConfig, OpenAIEmbeddingProvider};
pub use storage::{
    InMemoryAdaptiveSettingsStore, InMemoryEvidenceStore, InMemoryFeedbackStore,
    InMemoryValueProfileStore,
};
