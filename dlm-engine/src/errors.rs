use dlm_core::SettingsError;
use dlm_db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("empty query")]
    EmptyInput,
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("store error: {0}")]
    Store(#[from] DbError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("embedding error: {0}")]
    Embedding(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
