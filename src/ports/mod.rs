//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the projection engine and the outside world. Adapters implement these
//! ports.
//!
//! ## Collaborator Ports
//!
//! - `EmbeddingProvider` - Text to vector, single and batch
//!
//! ## Store Ports
//!
//! - `EvidenceStore` - Top-K similar fragments for a query vector
//! - `ValueProfileStore` - Explicit importance and implicit value nodes
//! - `AdaptiveSettingsStore` - Versioned lambda / regret prior per user
//! - `FeedbackStore` - Outcome feedback and derived statistics

mod adaptive_settings_store;
mod embedding_provider;
mod evidence_store;
mod feedback_store;
mod value_profile_store;

pub use adaptive_settings_store::AdaptiveSettingsStore;
pub use embedding_provider::{EmbeddingError, EmbeddingProvider, EmbeddingProviderInfo};
pub use evidence_store::EvidenceStore;
pub use feedback_store::FeedbackStore;
pub use value_profile_store::ValueProfileStore;
