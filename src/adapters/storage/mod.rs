//! Storage Adapters
//!
//! In-memory implementations of the store ports.
//!
//! ## Available Adapters
//!
//! - **InMemoryEvidenceStore** - Brute-force cosine top-K over fragments
//! - **InMemoryValueProfileStore** - Explicit ratings and implicit nodes
//! - **InMemoryAdaptiveSettingsStore** - Versioned lambda / regret prior
//! - **InMemoryFeedbackStore** - Append-only outcome feedback
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryAdaptiveSettingsStore, InMemoryEvidenceStore};
//!
//! let evidence = InMemoryEvidenceStore::new(config.engine.min_evidence_similarity);
//! let settings = InMemoryAdaptiveSettingsStore::new(1.0, 0.2);
//! ```

mod in_memory_evidence_store;
mod in_memory_feedback_store;
mod in_memory_settings_store;
mod in_memory_value_profile_store;

pub use in_memory_evidence_store::InMemoryEvidenceStore;
pub use in_memory_feedback_store::InMemoryFeedbackStore;
pub use in_memory_settings_store::InMemoryAdaptiveSettingsStore;
pub use in_memory_value_profile_store::InMemoryValueProfileStore;
