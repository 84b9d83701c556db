//! Shared configuration and domain types for the DLM question-answering agent.

pub mod config;
pub mod domain;

pub use config::{
    Config, ConfigError, EmbeddingSettings, LoggingSettings, MatchingSettings, ReasoningSettings,
    Secrets, Settings, SettingsError, StoreSettings, load_dotenv,
};
pub use domain::{Category, Mode, ParseCategoryError, ParseModeError};
