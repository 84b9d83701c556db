//! Errors from the knowledge store.

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("Knowledge migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Creating the database directory failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Questions are the unique key and may not be blank
    #[error("Question key must not be empty")]
    EmptyQuestion,
}

pub type DbResult<T> = Result<T, DbError>;
