//! Value Alignment Calculator - which option leans toward each value axis.
//!
//! Purely descriptive: 0.5 is neutral, above favours option A, below
//! favours option B. Never used to rank options.

use std::collections::BTreeMap;

use crate::domain::foundation::{UnitInterval, ValidationError};

use super::value_axis::{ImplicitValueNode, ValueAxis, ValueImportance};
use super::vector::{cosine_similarity, Embedding};

/// Largest possible `sim_a - sim_b` for cosine similarities.
pub const MAX_BASE_DIFF: f64 = 2.0;

/// Largest explicit importance rating.
pub const MAX_IMPORTANCE: f64 = 1.0;

/// Normalization bound for the amplified difference.
///
/// The implicit valence adjustment ranges over [0.5, 1.5] and can push
/// magnitudes past this bound; the final clamp saturates those.
pub const MAX_AMPLIFIED_MAGNITUDE: f64 = MAX_BASE_DIFF * (1.0 + MAX_IMPORTANCE);

/// Fragment count at which implicit evidence reaches full confidence.
pub const IMPLICIT_CONFIDENCE_SATURATION: f64 = 10.0;

/// Scale applied to implicit average valence.
pub const VALENCE_ADJUSTMENT_SCALE: f64 = 0.5;

/// Embeddings for the canonical description of every value axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisEmbeddings {
    embeddings: BTreeMap<ValueAxis, Embedding>,
}

impl AxisEmbeddings {
    /// Requires one embedding per axis, all of the same dimension.
    pub fn new(
        embeddings: impl IntoIterator<Item = (ValueAxis, Embedding)>,
    ) -> Result<Self, ValidationError> {
        let embeddings: BTreeMap<_, _> = embeddings.into_iter().collect();
        for axis in ValueAxis::ALL {
            if !embeddings.contains_key(&axis) {
                return Err(ValidationError::empty_field(format!(
                    "axis_embeddings.{}",
                    axis.key()
                )));
            }
        }
        let mut dimensions = embeddings.values().map(Embedding::dimension);
        if let Some(first) = dimensions.next() {
            if let Some(other) = dimensions.find(|d| *d != first) {
                return Err(ValidationError::dimension_mismatch(first, other));
            }
        }
        Ok(Self { embeddings })
    }

    /// Pairs [`ValueAxis::ALL`] in order with the given embeddings.
    pub fn from_ordered(embeddings: Vec<Embedding>) -> Result<Self, ValidationError> {
        if embeddings.len() != ValueAxis::ALL.len() {
            return Err(ValidationError::out_of_range(
                "axis_embeddings",
                ValueAxis::ALL.len() as f64,
                ValueAxis::ALL.len() as f64,
                embeddings.len() as f64,
            ));
        }
        Self::new(ValueAxis::ALL.into_iter().zip(embeddings))
    }

    pub fn get(&self, axis: ValueAxis) -> &Embedding {
        // Presence of every axis is checked in `new`.
        &self.embeddings[&axis]
    }

    pub fn dimension(&self) -> usize {
        self.get(ValueAxis::Growth).dimension()
    }
}

/// Per-axis descriptive alignment.
pub struct ValueAlignmentCalculator;

impl ValueAlignmentCalculator {
    /// Alignment for every axis.
    pub fn calculate(
        option_a: &Embedding,
        option_b: &Embedding,
        axes: &AxisEmbeddings,
        importance: &ValueImportance,
        implicit_nodes: &[ImplicitValueNode],
    ) -> Result<BTreeMap<ValueAxis, f64>, ValidationError> {
        ValueAxis::ALL
            .into_iter()
            .map(|axis| {
                let implicit = implicit_nodes.iter().find(|n| n.axis() == axis);
                let alignment = Self::align_axis(
                    option_a,
                    option_b,
                    axes.get(axis),
                    importance.importance(axis),
                    implicit,
                )?;
                Ok((axis, alignment))
            })
            .collect()
    }

    /// Alignment for a single axis.
    ///
    /// ```text
    /// diff = (cos(a, axis) - cos(b, axis)) * (1 + importance)
    /// diff *= 1 + avg_valence * 0.5 * min(count / 10, 1)    (implicit node, count > 0)
    /// alignment = clamp((diff / 4 + 1) / 2, 0, 1)
    /// ```
    pub fn align_axis(
        option_a: &Embedding,
        option_b: &Embedding,
        axis_embedding: &Embedding,
        importance: f64,
        implicit: Option<&ImplicitValueNode>,
    ) -> Result<f64, ValidationError> {
        let sim_a = cosine_similarity(option_a, axis_embedding)?;
        let sim_b = cosine_similarity(option_b, axis_embedding)?;
        let base_diff = sim_a - sim_b;

        let mut amplified = base_diff * (1.0 + importance);
        if let Some(node) = implicit.filter(|n| n.fragment_count() > 0) {
            let confidence =
                (f64::from(node.fragment_count()) / IMPLICIT_CONFIDENCE_SATURATION).min(1.0);
            amplified *= 1.0 + node.avg_valence() * VALENCE_ADJUSTMENT_SCALE * confidence;
        }

        Ok(UnitInterval::clamped((amplified / MAX_AMPLIFIED_MAGNITUDE + 1.0) / 2.0).value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn emb(values: &[f32]) -> Embedding {
        Embedding::new(values.to_vec()).unwrap()
    }

    fn axes_all(values: &[f32]) -> AxisEmbeddings {
        AxisEmbeddings::new(ValueAxis::ALL.into_iter().map(|a| (a, emb(values)))).unwrap()
    }

    #[test]
    fn normalization_bound_is_four() {
        assert_eq!(MAX_AMPLIFIED_MAGNITUDE, 4.0);
    }

    #[test]
    fn axis_embeddings_require_every_axis() {
        let partial = AxisEmbeddings::new([(ValueAxis::Growth, emb(&[1.0]))]);
        assert!(matches!(partial, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn axis_embeddings_require_one_dimension() {
        let mut pairs: Vec<_> = ValueAxis::ALL.into_iter().map(|a| (a, emb(&[1.0, 0.0]))).collect();
        pairs[3].1 = emb(&[1.0, 0.0, 0.0]);
        assert!(matches!(
            AxisEmbeddings::new(pairs),
            Err(ValidationError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn from_ordered_requires_eight() {
        assert!(AxisEmbeddings::from_ordered(vec![emb(&[1.0]); 7]).is_err());
        assert!(AxisEmbeddings::from_ordered(vec![emb(&[1.0]); 8]).is_ok());
    }

    #[test]
    fn identical_options_are_neutral_on_every_axis() {
        let option = emb(&[0.3, 0.7]);
        let map = ValueAlignmentCalculator::calculate(
            &option,
            &option,
            &axes_all(&[1.0, 0.0]),
            &ValueImportance::new(),
            &[],
        )
        .unwrap();
        assert_eq!(map.len(), 8);
        assert!(map.values().all(|v| (v - 0.5).abs() < 1e-12));
    }

    #[test]
    fn option_closer_to_axis_scores_above_half() {
        // sim_a = 1, sim_b = 0, importance 0.5 -> diff 1.5 -> (1.5/4 + 1)/2 = 0.6875
        let value = ValueAlignmentCalculator::align_axis(
            &emb(&[1.0, 0.0]),
            &emb(&[0.0, 1.0]),
            &emb(&[1.0, 0.0]),
            0.5,
            None,
        )
        .unwrap();
        assert!((value - 0.6875).abs() < 1e-12);
    }

    #[test]
    fn higher_importance_amplifies() {
        let low = ValueAlignmentCalculator::align_axis(
            &emb(&[1.0, 0.0]),
            &emb(&[0.0, 1.0]),
            &emb(&[1.0, 0.0]),
            0.0,
            None,
        )
        .unwrap();
        let high = ValueAlignmentCalculator::align_axis(
            &emb(&[1.0, 0.0]),
            &emb(&[0.0, 1.0]),
            &emb(&[1.0, 0.0]),
            1.0,
            None,
        )
        .unwrap();
        assert!((low - 0.625).abs() < 1e-12);
        assert!((high - 0.75).abs() < 1e-12);
    }

    #[test]
    fn implicit_positive_valence_amplifies_with_confidence() {
        let node = ImplicitValueNode::new(ValueAxis::Growth, 5, 1.0).unwrap();
        // confidence 0.5, adjustment 1.25, diff 1.5 * 1.25 = 1.875
        let value = ValueAlignmentCalculator::align_axis(
            &emb(&[1.0, 0.0]),
            &emb(&[0.0, 1.0]),
            &emb(&[1.0, 0.0]),
            0.5,
            Some(&node),
        )
        .unwrap();
        assert!((value - (1.875 / 4.0 + 1.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn implicit_node_without_fragments_is_ignored() {
        let node = ImplicitValueNode::new(ValueAxis::Growth, 0, 1.0).unwrap();
        let with = ValueAlignmentCalculator::align_axis(
            &emb(&[1.0, 0.0]),
            &emb(&[0.0, 1.0]),
            &emb(&[1.0, 0.0]),
            0.5,
            Some(&node),
        )
        .unwrap();
        assert!((with - 0.6875).abs() < 1e-12);
    }

    #[test]
    fn extreme_inputs_saturate_at_one() {
        let node = ImplicitValueNode::new(ValueAxis::Growth, 50, 1.0).unwrap();
        // diff 2 * 2 * 1.5 = 6 > 4
        let value = ValueAlignmentCalculator::align_axis(
            &emb(&[1.0, 0.0]),
            &emb(&[-1.0, 0.0]),
            &emb(&[1.0, 0.0]),
            1.0,
            Some(&node),
        )
        .unwrap();
        assert_eq!(value, 1.0);
    }

    proptest! {
        #[test]
        fn alignment_stays_in_unit_range(
            a in prop::collection::vec(-1.0f32..1.0, 4),
            b in prop::collection::vec(-1.0f32..1.0, 4),
            axis in prop::collection::vec(-1.0f32..1.0, 4),
            importance in 0.0f64..=1.0,
            count in 0u32..40,
            valence in -1.0f64..=1.0,
        ) {
            let node = ImplicitValueNode::new(ValueAxis::Meaning, count, valence).unwrap();
            let value = ValueAlignmentCalculator::align_axis(
                &emb(&a), &emb(&b), &emb(&axis), importance, Some(&node),
            ).unwrap();
            prop_assert!((0.0..=1.0).contains(&value));
        }

        #[test]
        fn explicit_importance_alone_never_saturates_past_bound(
            a in prop::collection::vec(-1.0f32..1.0, 4),
            b in prop::collection::vec(-1.0f32..1.0, 4),
            axis in prop::collection::vec(-1.0f32..1.0, 4),
            importance in 0.0f64..=1.0,
        ) {
            let sim_a = cosine_similarity(&emb(&a), &emb(&axis)).unwrap();
            let sim_b = cosine_similarity(&emb(&b), &emb(&axis)).unwrap();
            let amplified = (sim_a - sim_b) * (1.0 + importance);
            prop_assert!(amplified.abs() <= MAX_AMPLIFIED_MAGNITUDE);
        }
    }
}
