//! Fit Scorer - how well each option matches the user's historical pattern.

use crate::domain::foundation::{UnitInterval, ValidationError};

use super::breakdown::{FitBreakdown, FragmentContribution, MAX_CONTRIBUTIONS};
use super::evidence::EvidenceItem;
use super::value_axis::ValueAxis;
use super::vector::{cosine_similarity, Embedding};

/// A user-chosen axis whose related evidence gets extra weight.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityAxis {
    pub axis: ValueAxis,
    pub embedding: Embedding,
}

/// Computes per-option fit scores from weighted evidence.
///
/// Per evidence item:
///
/// ```text
/// priority_weight = 1 + boost * max(0, cos(fragment, axis))   (1 without an axis)
/// weight          = similarity * priority_weight
/// valence_weight  = (1 + valence) / 2
/// contribution_X  = cos(option_X, fragment) * weight * valence_weight
/// fit_X           = clamp(sum(contribution_X) / sum(weight), 0, 1)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FitScorer {
    priority_axis_boost: f64,
}

impl FitScorer {
    pub fn new(priority_axis_boost: f64) -> Self {
        Self {
            priority_axis_boost,
        }
    }

    /// Scores both options against the evidence.
    ///
    /// # Edge Cases
    /// - Empty evidence: neutral breakdown (0.5 / 0.5, zero weight)
    /// - Zero total weight: 0.5 / 0.5, contributions still reported
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if any embedding differs in dimension.
    pub fn score(
        &self,
        option_a: &Embedding,
        option_b: &Embedding,
        evidence: &[EvidenceItem],
        priority: Option<&PriorityAxis>,
    ) -> Result<FitBreakdown, ValidationError> {
        let priority_axis = priority.map(|p| p.axis);
        if evidence.is_empty() {
            return Ok(FitBreakdown::neutral(
                priority_axis,
                self.priority_axis_boost,
            ));
        }

        let mut sum_a = 0.0;
        let mut sum_b = 0.0;
        let mut total_weight = 0.0;
        let mut contributions = Vec::with_capacity(evidence.len());

        for item in evidence {
            let priority_weight = match priority {
                Some(p) => {
                    let related = cosine_similarity(item.embedding(), &p.embedding)?;
                    1.0 + self.priority_axis_boost * related.max(0.0)
                }
                None => 1.0,
            };
            let weight = item.similarity() * priority_weight;
            let valence_weight = (1.0 + item.valence()) / 2.0;

            let align_a = cosine_similarity(option_a, item.embedding())?;
            let align_b = cosine_similarity(option_b, item.embedding())?;
            let contribution_to_a = align_a * weight * valence_weight;
            let contribution_to_b = align_b * weight * valence_weight;

            sum_a += contribution_to_a;
            sum_b += contribution_to_b;
            total_weight += weight;

            contributions.push(FragmentContribution {
                fragment_id: item.id(),
                summary: item.fragment().summary(),
                similarity: item.similarity(),
                valence_weight,
                priority_weight,
                contribution_to_a,
                contribution_to_b,
            });
        }

        let (fit_a, fit_b) = if total_weight > 0.0 {
            (
                UnitInterval::clamped(sum_a / total_weight).value(),
                UnitInterval::clamped(sum_b / total_weight).value(),
            )
        } else {
            (0.5, 0.5)
        };

        // Stable: ties keep evidence order.
        contributions.sort_by(|x, y| y.combined().total_cmp(&x.combined()));
        contributions.truncate(MAX_CONTRIBUTIONS);

        tracing::trace!(
            fit_a,
            fit_b,
            total_weight,
            evidence = evidence.len(),
            "fit scored"
        );

        FitBreakdown::new(
            fit_a,
            fit_b,
            total_weight,
            priority_axis,
            self.priority_axis_boost,
            contributions,
        )
    }
}
