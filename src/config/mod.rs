//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables (and optionally a TOML file) using the `config` and `dotenvy`
//! crates. Environment variables use the `DECISION_PROJECTION` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use decision_projection::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Evidence top-k: {}", config.engine.evidence_top_k);
//! ```

mod embedding;
mod engine;
mod error;
mod learning;
mod logging;

pub use embedding::{EmbeddingConfig, EmbeddingProviderKind};
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use learning::LearningConfig;
pub use logging::LoggingConfig;

use serde::Deserialize;
use std::path::Path;

const ENV_PREFIX: &str = "DECISION_PROJECTION";
const ENV_SEPARATOR: &str = "__";

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// configuration backed by the mock embedding provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Scoring constants and evidence limits
    #[serde(default)]
    pub engine: EngineConfig,

    /// Lambda adaptation policy
    #[serde(default)]
    pub learning: LearningConfig,

    /// Embedding provider selection and credentials
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Tracing output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DECISION_PROJECTION` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DECISION_PROJECTION__ENGINE__EVIDENCE_TOP_K=30` -> `engine.evidence_top_k = 30`
    /// - `DECISION_PROJECTION__EMBEDDING__PROVIDER=openai` -> `embedding.provider = openai`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration from a TOML file, with environment variables
    /// taking precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or malformed, or if
    /// values cannot be parsed into expected types.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::File::from(path.as_ref())
                    .format(config::FileFormat::Toml)
                    .required(true),
            )
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    fn environment() -> config::Environment {
        config::Environment::default()
            .prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any section is invalid, or if the
    /// default lambda lies outside the learning bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.engine.validate()?;
        self.learning.validate()?;
        self.embedding.validate()?;
        self.logging.validate()?;

        let lambda = self.engine.default_lambda;
        if lambda < self.learning.lambda_floor || lambda > self.learning.lambda_ceiling {
            return Err(ValidationError::DefaultLambdaOutOfBounds);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "DECISION_PROJECTION__ENGINE__DEFAULT_LAMBDA",
        "DECISION_PROJECTION__ENGINE__EVIDENCE_TOP_K",
        "DECISION_PROJECTION__LEARNING__MAX_SAVE_ATTEMPTS",
        "DECISION_PROJECTION__EMBEDDING__PROVIDER",
        "DECISION_PROJECTION__EMBEDDING__API_KEY",
        "DECISION_PROJECTION__EMBEDDING__DIMENSION",
        "DECISION_PROJECTION__LOGGING__JSON",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.learning, LearningConfig::default());
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Mock);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("DECISION_PROJECTION__ENGINE__EVIDENCE_TOP_K", "30");
        env::set_var("DECISION_PROJECTION__ENGINE__DEFAULT_LAMBDA", "1.5");
        env::set_var("DECISION_PROJECTION__EMBEDDING__PROVIDER", "openai");
        env::set_var("DECISION_PROJECTION__EMBEDDING__API_KEY", "sk-test");
        env::set_var("DECISION_PROJECTION__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.engine.evidence_top_k, 30);
        assert_eq!(config.engine.default_lambda, 1.5);
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::OpenAI);
        assert!(config.embedding.has_api_key());
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file_with_env_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[engine]
evidence_top_k = 12
default_regret_prior = 0.25

[learning]
max_save_attempts = 5

[embedding]
dimension = 64
"#
        )
        .unwrap();

        env::set_var("DECISION_PROJECTION__EMBEDDING__DIMENSION", "128");
        let result = AppConfig::load_from_file(file.path());
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.engine.evidence_top_k, 12);
        assert_eq!(config.engine.default_regret_prior, 0.25);
        assert_eq!(config.learning.max_save_attempts, 5);
        assert_eq!(config.embedding.dimension, 128);
        assert_eq!(config.engine.default_lambda, 1.0);
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_from_file(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_validate_rejects_default_lambda_outside_bounds() {
        let mut config = AppConfig::default();
        config.engine.default_lambda = 3.0;
        assert_eq!(
            config.validate(),
            Err(ValidationError::DefaultLambdaOutOfBounds)
        );
    }

    #[test]
    fn test_validate_openai_without_key_fails() {
        let mut config = AppConfig::default();
        config.embedding.provider = EmbeddingProviderKind::OpenAI;
        assert!(config.validate().is_err());
    }
}
