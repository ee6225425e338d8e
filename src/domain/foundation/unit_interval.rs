//! Unit interval value object (0.0-1.0 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A finite value between 0.0 and 1.0 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct UnitInterval(f64);

impl UnitInterval {
    /// Zero.
    pub const ZERO: Self = Self(0.0);

    /// The neutral midpoint.
    pub const HALF: Self = Self(0.5);

    /// Creates a UnitInterval, returning error if out of range or non-finite.
    pub fn try_new(field: &str, value: f64) -> Result<Self, ValidationError> {
        ValidationError::check_range(field, value, 0.0, 1.0).map(Self)
    }

    /// Creates a UnitInterval from a computed value, clamping into range.
    ///
    /// NaN collapses to the neutral midpoint.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::HALF;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Returns the value as f64.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for UnitInterval {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f64> for UnitInterval {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new("unit_interval", value)
    }
}

impl From<UnitInterval> for f64 {
    fn from(value: UnitInterval) -> Self {
        value.0
    }
}

impl fmt::Display for UnitInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_accepts_valid_values() {
        assert!(UnitInterval::try_new("p", 0.0).is_ok());
        assert!(UnitInterval::try_new("p", 0.5).is_ok());
        assert!(UnitInterval::try_new("p", 1.0).is_ok());
    }

    #[test]
    fn try_new_rejects_out_of_range() {
        match UnitInterval::try_new("regret_prior", 1.2) {
            Err(ValidationError::OutOfRange { field, actual, .. }) => {
                assert_eq!(field, "regret_prior");
                assert!((actual - 1.2).abs() < f64::EPSILON);
            }
            other => panic!("Expected OutOfRange error, got {:?}", other),
        }
    }

    #[test]
    fn clamped_bounds_computed_values() {
        assert_eq!(UnitInterval::clamped(-0.3).value(), 0.0);
        assert_eq!(UnitInterval::clamped(1.7).value(), 1.0);
        assert_eq!(UnitInterval::clamped(f64::NAN).value(), 0.5);
    }

    #[test]
    fn deserializing_rejects_out_of_range() {
        assert!(serde_json::from_str::<UnitInterval>("0.25").is_ok());
        assert!(serde_json::from_str::<UnitInterval>("1.5").is_err());
    }

    #[test]
    fn displays_four_decimals() {
        assert_eq!(format!("{}", UnitInterval::HALF), "0.5000");
    }
}
