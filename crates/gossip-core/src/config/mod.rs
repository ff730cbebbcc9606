//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Every field carries a default, so a missing file or an
//! empty section still yields a usable configuration.

pub mod api;
pub mod logging;
pub mod presence;
pub mod session;

use std::path::Path;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::logging::LoggingConfig;
use self::presence::PresenceConfig;
use self::session::SessionConfig;

use crate::error::AppError;

/// Environment variable prefix; `GOSSIP__API__BASE_URL` overrides `api.base_url`.
pub const ENV_PREFIX: &str = "GOSSIP";

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// (default.toml + environment overlay + environment variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// REST gateway settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Session persistence and authentication settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Presence channel settings.
    #[serde(default)]
    pub presence: PresenceConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config/` relative to the working directory.
    ///
    /// Merges `config/default.toml` with `config/{env}.toml` and environment
    /// variables prefixed with `GOSSIP__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from(Path::new("config"), env)
    }

    /// Load configuration from an explicit directory.
    pub fn load_from(dir: &Path, env: &str) -> Result<Self, AppError> {
        let default_path = dir.join("default");
        let env_path = dir.join(env);

        let config = config::Config::builder()
            .add_source(config::File::with_name(&default_path.to_string_lossy()).required(false))
            .add_source(config::File::with_name(&env_path.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("presence.roster")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.presence.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::presence::TransportKind;
    use crate::config::session::StorageBackend;

    #[test]
    fn missing_directory_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent"), "test").unwrap();

        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.session.storage_key, "chatUser");
        assert_eq!(config.presence.transport, TransportKind::Simulated);
        assert_eq!(config.presence.roster.len(), 5);
    }

    #[test]
    fn environment_file_overrides_default_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[session]\nstorage = \"file\"\n[presence]\ntick_interval_ms = 10000\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("staging.toml"),
            "[session]\nstorage = \"memory\"\n[presence]\ntick_interval_ms = 250\nseed = 7\n",
        )
        .unwrap();

        let config = AppConfig::load_from(dir.path(), "staging").unwrap();
        assert_eq!(config.session.storage, StorageBackend::Memory);
        assert_eq!(config.presence.tick_interval_ms, 250);
        assert_eq!(config.presence.seed, Some(7));
        assert_eq!(config.presence.connect_delay_ms, 500);
    }

    #[test]
    fn invalid_value_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[presence]\ntransport = \"carrier-pigeon\"\n",
        )
        .unwrap();

        let err = AppConfig::load_from(dir.path(), "none").unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::Configuration);
    }

    #[test]
    fn zero_tick_and_bad_probabilities_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[presence]\ntick_interval_ms = 0\n",
        )
        .unwrap();
        let err = AppConfig::load_from(dir.path(), "none").unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::Configuration);
        assert!(err.message.contains("tick_interval_ms"));

        std::fs::write(
            dir.path().join("default.toml"),
            "[presence]\nselect_probability = 1.5\n",
        )
        .unwrap();
        let err = AppConfig::load_from(dir.path(), "none").unwrap_err();
        assert!(err.message.contains("select_probability"));
    }
}
