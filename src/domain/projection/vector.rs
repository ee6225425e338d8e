//! Embedding vectors and the similarity operations every scorer builds on.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::foundation::ValidationError;

/// Fixed-length embedding produced by the embedding provider.
///
/// Immutable and cheap to clone. Guaranteed non-empty with finite
/// components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct Embedding(Arc<[f32]>);

impl Embedding {
    /// Creates an embedding, rejecting empty or non-finite vectors.
    pub fn new(values: Vec<f32>) -> Result<Self, ValidationError> {
        if values.is_empty() {
            return Err(ValidationError::EmptyEmbedding);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::non_finite("embedding"));
        }
        Ok(Self(values.into()))
    }

    /// Number of dimensions.
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Raw components.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Euclidean norm, accumulated in f64.
    pub fn norm(&self) -> f64 {
        self.0
            .iter()
            .map(|&v| f64::from(v) * f64::from(v))
            .sum::<f64>()
            .sqrt()
    }

    /// Component-wise mean of two embeddings of equal dimension.
    pub fn midpoint(&self, other: &Embedding) -> Result<Embedding, ValidationError> {
        ensure_same_dimension(self, other)?;
        let values = self
            .0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a + b) / 2.0)
            .collect();
        Embedding::new(values)
    }
}

impl TryFrom<Vec<f32>> for Embedding {
    type Error = ValidationError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Embedding::new(values)
    }
}

impl From<Embedding> for Vec<f32> {
    fn from(embedding: Embedding) -> Self {
        embedding.0.to_vec()
    }
}

fn ensure_same_dimension(u: &Embedding, v: &Embedding) -> Result<(), ValidationError> {
    if u.dimension() != v.dimension() {
        return Err(ValidationError::dimension_mismatch(
            u.dimension(),
            v.dimension(),
        ));
    }
    Ok(())
}

/// Dot product of two embeddings of equal dimension.
pub fn dot_product(u: &Embedding, v: &Embedding) -> Result<f64, ValidationError> {
    ensure_same_dimension(u, v)?;
    Ok(u.0
        .iter()
        .zip(v.0.iter())
        .map(|(&a, &b)| f64::from(a) * f64::from(b))
        .sum())
}

/// Cosine similarity in [-1, 1].
///
/// Returns 0.0 when either vector has zero norm.
pub fn cosine_similarity(u: &Embedding, v: &Embedding) -> Result<f64, ValidationError> {
    let dot = dot_product(u, v)?;
    let denom = u.norm() * v.norm();
    if denom == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / denom).clamp(-1.0, 1.0))
}
