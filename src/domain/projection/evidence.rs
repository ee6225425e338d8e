//! Historical thought fragments and the evidence items built from them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{FragmentId, Timestamp, ValidationError};

use super::vector::Embedding;

/// Maximum length (in characters) of a contribution summary.
pub const SUMMARY_MAX_CHARS: usize = 80;

const ELLIPSIS: &str = "...";

/// A recorded thought with its emotional tone and embedding.
///
/// Owned by the evidence store; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ThoughtFragmentRaw")]
pub struct ThoughtFragment {
    id: FragmentId,
    text: String,
    created_at: Timestamp,
    valence: f64,
    arousal: f64,
    embedding: Embedding,
}

impl ThoughtFragment {
    /// Creates a fragment.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if `text` is blank
    /// - `OutOfRange` if valence is outside [-1, 1] or arousal outside [0, 1]
    pub fn new(
        id: FragmentId,
        text: impl Into<String>,
        created_at: Timestamp,
        valence: f64,
        arousal: f64,
        embedding: Embedding,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        let valence = ValidationError::check_range("valence", valence, -1.0, 1.0)?;
        let arousal = ValidationError::check_range("arousal", arousal, 0.0, 1.0)?;

        Ok(Self {
            id,
            text,
            created_at,
            valence,
            arousal,
            embedding,
        })
    }

    pub fn id(&self) -> FragmentId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Emotional positivity in [-1, 1].
    pub fn valence(&self) -> f64 {
        self.valence
    }

    /// Activation intensity in [0, 1].
    pub fn arousal(&self) -> f64 {
        self.arousal
    }

    pub fn embedding(&self) -> &Embedding {
        &self.embedding
    }

    /// Text truncated to at most [`SUMMARY_MAX_CHARS`] characters.
    pub fn summary(&self) -> String {
        truncate_summary(&self.text)
    }
}

#[derive(Deserialize)]
struct ThoughtFragmentRaw {
    id: FragmentId,
    text: String,
    created_at: Timestamp,
    valence: f64,
    arousal: f64,
    embedding: Embedding,
}

impl TryFrom<ThoughtFragmentRaw> for ThoughtFragment {
    type Error = ValidationError;

    fn try_from(raw: ThoughtFragmentRaw) -> Result<Self, Self::Error> {
        Self::new(
            raw.id,
            raw.text,
            raw.created_at,
            raw.valence,
            raw.arousal,
            raw.embedding,
        )
    }
}

/// A fragment paired with its similarity to the decision context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EvidenceItemRaw")]
pub struct EvidenceItem {
    fragment: ThoughtFragment,
    similarity: f64,
}

impl EvidenceItem {
    /// Creates an evidence item. Similarity must lie in [0, 1].
    pub fn new(fragment: ThoughtFragment, similarity: f64) -> Result<Self, ValidationError> {
        let similarity = ValidationError::check_range("similarity", similarity, 0.0, 1.0)?;
        Ok(Self {
            fragment,
            similarity,
        })
    }

    pub fn fragment(&self) -> &ThoughtFragment {
        &self.fragment
    }

    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    pub fn id(&self) -> FragmentId {
        self.fragment.id
    }

    pub fn valence(&self) -> f64 {
        self.fragment.valence
    }

    pub fn embedding(&self) -> &Embedding {
        &self.fragment.embedding
    }
}

#[derive(Deserialize)]
struct EvidenceItemRaw {
    fragment: ThoughtFragment,
    similarity: f64,
}

impl TryFrom<EvidenceItemRaw> for EvidenceItem {
    type Error = ValidationError;

    fn try_from(raw: EvidenceItemRaw) -> Result<Self, Self::Error> {
        Self::new(raw.fragment, raw.similarity)
    }
}

fn truncate_summary(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= SUMMARY_MAX_CHARS {
        return trimmed.to_string();
    }
    let keep = SUMMARY_MAX_CHARS - ELLIPSIS.len();
    let mut summary: String = trimmed.chars().take(keep).collect();
    summary.push_str(ELLIPSIS);
    summary
}
