//! Shared SQLite runtime bootstrap helpers for the knowledge pool.

use std::path::Path;

use sqlx::{
    Row, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

use crate::error::DbResult;

pub(crate) async fn create_file_pool(db_path: &Path, max_connections: u32) -> DbResult<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    create_pool(options, max_connections).await
}

#[cfg(any(test, feature = "test-helpers"))]
pub(crate) async fn create_in_memory_pool(max_connections: u32) -> DbResult<SqlitePool> {
    let options = SqliteConnectOptions::new().filename(":memory:");

    create_pool(options, max_connections).await
}

async fn create_pool(options: SqliteConnectOptions, max_connections: u32) -> DbResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    apply_common_pragmas(&pool).await?;

    Ok(pool)
}

async fn apply_common_pragmas(pool: &SqlitePool) -> DbResult<()> {
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(pool)
        .await?;

    Ok(())
}

/// Run the knowledge migrations, then upgrade tables written before the
/// category column existed.
pub(crate) async fn migrate_knowledge(pool: &SqlitePool) -> DbResult<()> {
    sqlx::migrate!("./migrations/knowledge")
        .run(pool)
        .await?;

    ensure_category_column(pool).await
}

async fn ensure_category_column(pool: &SqlitePool) -> DbResult<()> {
    let columns = sqlx::query("PRAGMA table_info(knowledge_base)")
        .fetch_all(pool)
        .await?;
    let has_category = columns
        .iter()
        .any(|row| row.get::<String, _>("name") == "category");

    if !has_category {
        info!("Adding missing category column to legacy knowledge_base table");
        sqlx::query("ALTER TABLE knowledge_base ADD COLUMN category TEXT NOT NULL DEFAULT ''")
            .execute(pool)
            .await?;
    }

    Ok(())
}
