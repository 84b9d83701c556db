//! Settings configuration loaded from TOML files.
//!
//! Non-sensitive configuration stored in the XDG config directory
//! (~/.config/dlm/config.toml).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default TOML configuration file content
const DEFAULT_CONFIG_TOML: &str = r#"# dlm configuration file
# Located at: ~/.config/dlm/config.toml
#
# The learn-mode password is read from the environment:
#   - DLM_TRAINING_PASSWORD

[store]
# db_path = "/path/to/dlm_database.db"  # Defaults to <data dir>/dlm/dlm_database.db

[matching]
edit_threshold = 0.65
semantic_threshold = 0.50

[embedding]
enabled = true
url = "http://127.0.0.1:11434"
model = "nomic-embed-text"

[reasoning]
# names_path = "/path/to/names.txt"  # One extra first name per line

[logging]
level = "info"
"#;

/// Settings loaded from TOML configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Knowledge store location
    #[serde(default)]
    pub store: StoreSettings,

    /// Confidence thresholds for recall
    #[serde(default)]
    pub matching: MatchingSettings,

    /// Semantic similarity oracle
    #[serde(default)]
    pub embedding: EmbeddingSettings,

    /// Compute-mode collaborators
    #[serde(default)]
    pub reasoning: ReasoningSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Explicit database file; resolved from the data directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingSettings {
    /// Accept a match when the best edit similarity reaches this value.
    #[serde(default = "default_edit_threshold")]
    pub edit_threshold: f64,

    /// Accept a match when the semantic similarity exceeds this value.
    #[serde(default = "default_semantic_threshold")]
    pub semantic_threshold: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            edit_threshold: default_edit_threshold(),
            semantic_threshold: default_semantic_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Disable to run without a semantic oracle (similarity is always absent).
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_embedding_url")]
    pub url: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_embedding_url(),
            model: default_embedding_model(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReasoningSettings {
    /// Extra first names for person detection, one per line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_edit_threshold() -> f64 {
    0.65
}

fn default_semantic_threshold() -> f64 {
    0.50
}

fn default_true() -> bool {
    true
}

fn default_embedding_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error("Data directory not found")]
    DataDirNotFound,
}

impl Settings {
    /// Load settings from the TOML configuration file.
    ///
    /// If the config file doesn't exist, creates it with default values.
    pub fn load() -> Result<Self, SettingsError> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load settings from an explicit path, creating the default file if missing.
    pub fn load_from_path(config_path: &Path) -> Result<Self, SettingsError> {
        if !config_path.exists() {
            tracing::info!("Creating default configuration at {:?}", config_path);
            Self::create_default_config(config_path)?;
        }

        let content = fs::read_to_string(config_path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content)?;
        Ok(settings)
    }

    /// Serialize settings to TOML content.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the configuration file path.
    ///
    /// `DLM_CONFIG_DIR` overrides the XDG location.
    pub fn config_path() -> Result<PathBuf, SettingsError> {
        if let Ok(override_dir) = std::env::var("DLM_CONFIG_DIR") {
            return Ok(PathBuf::from(override_dir).join("config.toml"));
        }

        let config_dir = dirs::config_dir()
            .ok_or(SettingsError::ConfigDirNotFound)?
            .join("dlm");

        Ok(config_dir.join("config.toml"))
    }

    /// Resolve the knowledge database file.
    ///
    /// Order: `[store] db_path`, then `DLM_DATA_DIR`, then the XDG data directory.
    pub fn db_path(&self) -> Result<PathBuf, SettingsError> {
        if let Some(path) = &self.store.db_path {
            return Ok(path.clone());
        }
        let data_dir = match std::env::var("DLM_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::data_dir()
                .ok_or(SettingsError::DataDirNotFound)?
                .join("dlm"),
        };
        Ok(data_dir.join("dlm_database.db"))
    }

    fn create_default_config(path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG_TOML)?;
        Ok(())
    }

    /// Save settings to a specific file path.
    pub fn save_to_path(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        fs::write(path, content)?;
        Ok(())
    }
}
