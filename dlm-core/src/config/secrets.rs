//! Secrets configuration loaded from environment variables only.

use std::env;

/// Secrets loaded exclusively from environment variables.
///
/// These values are never written to the TOML settings file.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    /// Password that unlocks learn mode (env: DLM_TRAINING_PASSWORD)
    pub training_password: Option<String>,
}

impl Secrets {
    /// Load secrets from environment variables.
    ///
    /// This also loads a .env file if present (for development).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self::from_env_inner()
    }

    /// Internal method to load from environment without loading .env
    pub(crate) fn from_env_inner() -> Self {
        Self {
            training_password: env::var("DLM_TRAINING_PASSWORD")
                .ok()
                .filter(|value| !value.is_empty()),
        }
    }
}
