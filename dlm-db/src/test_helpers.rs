//! Test helpers for the knowledge database.

use crate::{
    error::DbResult,
    knowledge_db::KnowledgeDbPool,
    sqlite_runtime::{create_in_memory_pool, migrate_knowledge},
};

/// Create an in-memory knowledge database for testing
pub async fn create_test_knowledge_pool() -> DbResult<KnowledgeDbPool> {
    let pool = create_in_memory_pool(1).await?;

    migrate_knowledge(&pool).await?;

    Ok(KnowledgeDbPool::from_pool(pool))
}
