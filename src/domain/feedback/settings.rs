//! Per-user adaptive parameters that evolve with feedback.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId, ValidationError};
use crate::domain::projection::{CalculationParameters, ScoringWeights};

use super::learner::LambdaAdjustment;

/// Settings version for optimistic concurrency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SettingsVersion(u64);

impl SettingsVersion {
    /// Create initial version (1)
    pub fn initial() -> Self {
        Self(1)
    }

    /// Create from value
    pub fn from_u64(value: u64) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::out_of_range(
                "version",
                1.0,
                u64::MAX as f64,
                0.0,
            ));
        }
        Ok(Self(value))
    }

    /// Increment version
    pub fn increment(&self) -> Self {
        Self(self.0 + 1)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for SettingsVersion {
    fn default() -> Self {
        Self::initial()
    }
}

impl TryFrom<u64> for SettingsVersion {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_u64(value)
    }
}

impl From<SettingsVersion> for u64 {
    fn from(version: SettingsVersion) -> Self {
        version.0
    }
}

impl std::fmt::Display for SettingsVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lambda and regret prior for one user.
///
/// Created with defaults on first access, changed only by applying a
/// [`LambdaAdjustment`] from the feedback learner. `version` is the version
/// the record was read at; the settings store bumps it on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UserAdaptiveSettingsRaw")]
pub struct UserAdaptiveSettings {
    user_id: UserId,
    lambda: f64,
    regret_prior: f64,
    version: SettingsVersion,
    updated_at: Timestamp,
}

impl UserAdaptiveSettings {
    pub fn new(
        user_id: UserId,
        lambda: f64,
        regret_prior: f64,
        version: SettingsVersion,
        updated_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id,
            lambda: ValidationError::check_range("lambda", lambda, 0.0, f64::MAX)?,
            regret_prior: ValidationError::check_range("regret_prior", regret_prior, 0.0, 1.0)?,
            version,
            updated_at,
        })
    }

    /// Fresh settings with the given defaults at version 1.
    pub fn with_defaults(
        user_id: UserId,
        default_lambda: f64,
        default_regret_prior: f64,
    ) -> Result<Self, ValidationError> {
        Self::new(
            user_id,
            default_lambda,
            default_regret_prior,
            SettingsVersion::initial(),
            Timestamp::now(),
        )
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn regret_prior(&self) -> f64 {
        self.regret_prior
    }

    pub fn version(&self) -> SettingsVersion {
        self.version
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns settings with the adjustment applied, keeping the read version.
    pub fn apply(&self, adjustment: LambdaAdjustment) -> Self {
        match adjustment {
            LambdaAdjustment::Unchanged => self.clone(),
            LambdaAdjustment::Increase { to, .. } | LambdaAdjustment::Decrease { to, .. } => {
                Self {
                    lambda: to,
                    updated_at: Timestamp::now(),
                    ..self.clone()
                }
            }
        }
    }

    /// Returns the record as stored after a successful save.
    pub fn saved(&self) -> Self {
        Self {
            version: self.version.increment(),
            ..self.clone()
        }
    }

    /// Calculation parameters for a projection with these settings.
    pub fn calculation_parameters(
        &self,
        weights: ScoringWeights,
    ) -> Result<CalculationParameters, ValidationError> {
        CalculationParameters::new(self.lambda, self.regret_prior, weights)
    }
}

#[derive(Deserialize)]
struct UserAdaptiveSettingsRaw {
    user_id: UserId,
    lambda: f64,
    regret_prior: f64,
    version: SettingsVersion,
    updated_at: Timestamp,
}

impl TryFrom<UserAdaptiveSettingsRaw> for UserAdaptiveSettings {
    type Error = ValidationError;

    fn try_from(raw: UserAdaptiveSettingsRaw) -> Result<Self, Self::Error> {
        Self::new(
            raw.user_id,
            raw.lambda,
            raw.regret_prior,
            raw.version,
            raw.updated_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> UserAdaptiveSettings {
        UserAdaptiveSettings::with_defaults(UserId::new("user-1").unwrap(), 1.0, 0.2).unwrap()
    }

    #[test]
    fn defaults_start_at_version_one() {
        let s = settings();
        assert_eq!(s.lambda(), 1.0);
        assert_eq!(s.regret_prior(), 0.2);
        assert_eq!(s.version(), SettingsVersion::initial());
    }

    #[test]
    fn rejects_invalid_values() {
        let user = UserId::new("user-1").unwrap();
        assert!(UserAdaptiveSettings::with_defaults(user.clone(), -1.0, 0.2).is_err());
        assert!(UserAdaptiveSettings::with_defaults(user, 1.0, 1.5).is_err());
    }

    #[test]
    fn version_zero_is_invalid() {
        assert!(SettingsVersion::from_u64(0).is_err());
        assert_eq!(SettingsVersion::from_u64(7).unwrap().as_u64(), 7);
    }

    #[test]
    fn apply_increase_sets_lambda_and_keeps_version() {
        let s = settings();
        let updated = s.apply(LambdaAdjustment::Increase { from: 1.0, to: 1.1 });
        assert_eq!(updated.lambda(), 1.1);
        assert_eq!(updated.version(), s.version());
        assert_eq!(updated.regret_prior(), s.regret_prior());
    }

    #[test]
    fn apply_unchanged_is_identity() {
        let s = settings();
        assert_eq!(s.apply(LambdaAdjustment::Unchanged), s);
    }

    #[test]
    fn saved_bumps_version() {
        let s = settings();
        assert_eq!(s.saved().version().as_u64(), 2);
    }

    fn settings_json(lambda: f64, regret_prior: f64, version: u64) -> serde_json::Value {
        serde_json::json!({
            "user_id": "user-1",
            "lambda": lambda,
            "regret_prior": regret_prior,
            "version": version,
            "updated_at": Timestamp::now(),
        })
    }

    #[test]
    fn deserializing_rejects_invalid_settings() {
        let rejects = |json| serde_json::from_value::<UserAdaptiveSettings>(json).is_err();
        assert!(rejects(settings_json(-3.0, 0.2, 1)));
        assert!(rejects(settings_json(1.0, 4.0, 1)));
        assert!(rejects(settings_json(1.0, 0.2, 0)));
    }

    #[test]
    fn stored_settings_survive_json_round_trip() {
        let s = settings().saved();
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["version"], 2);
        let restored: UserAdaptiveSettings = serde_json::from_value(json).unwrap();
        assert_eq!(restored, s);
    }

    #[test]
    fn builds_calculation_parameters() {
        let params = settings()
            .calculation_parameters(ScoringWeights::default())
            .unwrap();
        assert_eq!(params.lambda(), 1.0);
        assert_eq!(params.regret_prior(), 0.2);
    }
}
