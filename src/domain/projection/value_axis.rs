//! The eight fixed value axes and the user's importance profile over them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::foundation::{UnitInterval, ValidationError};

/// Importance assumed for an axis the user never rated.
pub const DEFAULT_IMPORTANCE: f64 = 0.5;

/// One of exactly eight fixed dimensions of personal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueAxis {
    Growth,
    Stability,
    Financial,
    Autonomy,
    Relationship,
    Achievement,
    Health,
    Meaning,
}

impl ValueAxis {
    /// All axes in canonical order.
    pub const ALL: [ValueAxis; 8] = [
        ValueAxis::Growth,
        ValueAxis::Stability,
        ValueAxis::Financial,
        ValueAxis::Autonomy,
        ValueAxis::Relationship,
        ValueAxis::Achievement,
        ValueAxis::Health,
        ValueAxis::Meaning,
    ];

    /// Stable machine key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::Stability => "stability",
            Self::Financial => "financial",
            Self::Autonomy => "autonomy",
            Self::Relationship => "relationship",
            Self::Achievement => "achievement",
            Self::Health => "health",
            Self::Meaning => "meaning",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Growth => "Growth & Learning",
            Self::Stability => "Stability & Security",
            Self::Financial => "Financial Wellbeing",
            Self::Autonomy => "Autonomy & Freedom",
            Self::Relationship => "Relationships & Connection",
            Self::Achievement => "Achievement & Recognition",
            Self::Health => "Health & Wellbeing",
            Self::Meaning => "Meaning & Purpose",
        }
    }

    /// Canonical description sent to the embedding provider.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Growth => {
                "Personal growth, learning new skills, self-improvement and developing as a person"
            }
            Self::Stability => {
                "Stability, security, predictability, safety and a steady routine in life"
            }
            Self::Financial => {
                "Financial security, income, wealth, savings and material resources"
            }
            Self::Autonomy => {
                "Autonomy, independence, freedom to choose and control over one's own time"
            }
            Self::Relationship => {
                "Relationships, family, friendship, love, belonging and time with people I care about"
            }
            Self::Achievement => {
                "Achievement, success, accomplishment, recognition and career advancement"
            }
            Self::Health => {
                "Physical and mental health, rest, energy, exercise and emotional wellbeing"
            }
            Self::Meaning => {
                "Meaning, purpose, contributing to something larger and living by my principles"
            }
        }
    }
}

impl fmt::Display for ValueAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Explicit per-axis importance ratings, each in [0, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueImportance {
    ratings: BTreeMap<ValueAxis, UnitInterval>,
}

impl ValueImportance {
    /// Creates an empty profile (every axis defaults to 0.5).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a profile from raw ratings, validating each.
    pub fn from_ratings(
        ratings: impl IntoIterator<Item = (ValueAxis, f64)>,
    ) -> Result<Self, ValidationError> {
        let mut profile = Self::new();
        for (axis, rating) in ratings {
            profile = profile.with_rating(axis, rating)?;
        }
        Ok(profile)
    }

    /// Returns a copy with one axis rated.
    pub fn with_rating(mut self, axis: ValueAxis, rating: f64) -> Result<Self, ValidationError> {
        let field = format!("importance.{}", axis.key());
        self.ratings
            .insert(axis, UnitInterval::try_new(&field, rating)?);
        Ok(self)
    }

    /// Importance for an axis, defaulting to [`DEFAULT_IMPORTANCE`].
    pub fn importance(&self, axis: ValueAxis) -> f64 {
        self.ratings
            .get(&axis)
            .map(UnitInterval::value)
            .unwrap_or(DEFAULT_IMPORTANCE)
    }

    /// Whether the user explicitly rated the axis.
    pub fn is_rated(&self, axis: ValueAxis) -> bool {
        self.ratings.contains_key(&axis)
    }
}

/// Value evidence inferred from the user's fragments for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ImplicitValueNodeRaw")]
pub struct ImplicitValueNode {
    axis: ValueAxis,
    fragment_count: u32,
    avg_valence: f64,
}

impl ImplicitValueNode {
    pub fn new(
        axis: ValueAxis,
        fragment_count: u32,
        avg_valence: f64,
    ) -> Result<Self, ValidationError> {
        let avg_valence = ValidationError::check_range("avg_valence", avg_valence, -1.0, 1.0)?;
        Ok(Self {
            axis,
            fragment_count,
            avg_valence,
        })
    }

    pub fn axis(&self) -> ValueAxis {
        self.axis
    }

    pub fn fragment_count(&self) -> u32 {
        self.fragment_count
    }

    pub fn avg_valence(&self) -> f64 {
        self.avg_valence
    }
}

#[derive(Deserialize)]
struct ImplicitValueNodeRaw {
    axis: ValueAxis,
    fragment_count: u32,
    avg_valence: f64,
}

impl TryFrom<ImplicitValueNodeRaw> for ImplicitValueNode {
    type Error = ValidationError;

    fn try_from(raw: ImplicitValueNodeRaw) -> Result<Self, Self::Error> {
        Self::new(raw.axis, raw.fragment_count, raw.avg_valence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn exactly_eight_distinct_axes() {
        let keys: HashSet<_> = ValueAxis::ALL.iter().map(|a| a.key()).collect();
        assert_eq!(keys.len(), 8);
    }

    #[test]
    fn every_axis_has_description() {
        for axis in ValueAxis::ALL {
            assert!(!axis.description().is_empty());
            assert!(!axis.label().is_empty());
        }
    }

    #[test]
    fn axis_serializes_snake_case() {
        let json = serde_json::to_string(&ValueAxis::Relationship).unwrap();
        assert_eq!(json, "\"relationship\"");
    }

    #[test]
    fn unrated_axis_defaults_to_half() {
        let profile = ValueImportance::new();
        assert_eq!(profile.importance(ValueAxis::Health), DEFAULT_IMPORTANCE);
        assert!(!profile.is_rated(ValueAxis::Health));
    }

    #[test]
    fn rated_axis_returns_rating() {
        let profile = ValueImportance::from_ratings([(ValueAxis::Growth, 0.9)]).unwrap();
        assert_eq!(profile.importance(ValueAxis::Growth), 0.9);
        assert!(profile.is_rated(ValueAxis::Growth));
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        let result = ValueImportance::from_ratings([(ValueAxis::Growth, 1.2)]);
        match result {
            Err(ValidationError::OutOfRange { field, .. }) => {
                assert_eq!(field, "importance.growth")
            }
            other => panic!("Expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn implicit_node_validates_valence() {
        assert!(ImplicitValueNode::new(ValueAxis::Meaning, 4, -1.2).is_err());
        let node = ImplicitValueNode::new(ValueAxis::Meaning, 4, 0.6).unwrap();
        assert_eq!(node.fragment_count(), 4);
    }

    #[test]
    fn deserializing_implicit_node_validates_valence() {
        let json = serde_json::json!({"axis": "meaning", "fragment_count": 4, "avg_valence": -3.0});
        assert!(serde_json::from_value::<ImplicitValueNode>(json).is_err());

        let json = serde_json::json!({"axis": "meaning", "fragment_count": 4, "avg_valence": 0.6});
        let node: ImplicitValueNode = serde_json::from_value(json).unwrap();
        assert_eq!(node.axis(), ValueAxis::Meaning);
    }
}
