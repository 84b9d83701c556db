//! Configuration management for dlm.
//!
//! Secrets come from environment variables, everything else from a TOML file.
//!
//! # Configuration Sources
//!
//! ## Secrets (Environment Variables)
//! - `DLM_TRAINING_PASSWORD` - password required to enter learn mode
//!
//! ## Settings (TOML File)
//! Located at `~/.config/dlm/config.toml`:
//! ```toml
//! [store]
//! db_path = "/home/me/.local/share/dlm/dlm_database.db"
//!
//! [matching]
//! edit_threshold = 0.65
//! semantic_threshold = 0.50
//!
//! [embedding]
//! enabled = true
//! url = "http://127.0.0.1:11434"
//! model = "nomic-embed-text"
//!
//! [logging]
//! level = "info"
//! ```

mod secrets;
mod settings;

pub use secrets::Secrets;
pub use settings::{
    EmbeddingSettings, LoggingSettings, MatchingSettings, ReasoningSettings, Settings,
    SettingsError, StoreSettings,
};

/// Combined configuration containing both secrets and settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secrets loaded from environment variables
    pub secrets: Secrets,
    /// Settings loaded from TOML configuration file
    pub settings: Settings,
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Matching threshold {name} must lie in [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
}

impl Config {
    /// Load configuration from all sources and validate it.
    pub fn load() -> Result<Self, ConfigError> {
        let secrets = Secrets::from_env();
        let settings = Settings::load()?;
        Self::from_parts(secrets, settings)
    }

    /// Validate already-loaded parts.
    pub fn from_parts(secrets: Secrets, settings: Settings) -> Result<Self, ConfigError> {
        let matching = &settings.matching;
        for (name, value) in [
            ("edit_threshold", matching.edit_threshold),
            ("semantic_threshold", matching.semantic_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        Ok(Self { secrets, settings })
    }

    /// Training password, if learn mode is gated.
    pub fn training_password(&self) -> Option<&str> {
        self.secrets.training_password.as_deref()
    }
}

/// Load `.env` from the working directory if present.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_accepts_defaults() {
        let config = Config::from_parts(Secrets::default(), Settings::default()).unwrap();
        assert!(config.training_password().is_none());
    }

    #[test]
    fn test_from_parts_rejects_threshold_above_one() {
        let mut settings = Settings::default();
        settings.matching.edit_threshold = 1.5;
        let err = Config::from_parts(Secrets::default(), settings).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ThresholdOutOfRange {
                name: "edit_threshold",
                ..
            }
        ));
    }
}
