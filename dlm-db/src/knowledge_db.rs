//! Knowledge database connection pool and initialization.

use std::path::{Path, PathBuf};

use sqlx::SqlitePool;
use tracing::info;

use crate::{
    error::DbResult,
    sqlite_runtime::{create_file_pool, migrate_knowledge},
};

/// Knowledge database pool wrapper
///
/// Each repository call checks a connection out of the pool for the duration
/// of a single statement; no transaction spans calls.
#[derive(Debug, Clone)]
pub struct KnowledgeDbPool {
    pool: SqlitePool,
    path: Option<PathBuf>,
}

impl KnowledgeDbPool {
    /// Open (or create) the knowledge database at `db_path` and migrate it.
    pub async fn open(db_path: &Path) -> DbResult<Self> {
        info!("Opening knowledge database at: {}", db_path.display());

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let pool = create_file_pool(db_path, 4).await?;

        migrate_knowledge(&pool).await?;

        info!("Knowledge database ready");
        Ok(Self {
            pool,
            path: Some(db_path.to_path_buf()),
        })
    }

    /// Get the inner SQLx pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Backing file, `None` for in-memory pools.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Create a KnowledgeDbPool from an existing, already migrated SqlitePool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool, path: None }
    }
}
