//! dlm-db: SQLite knowledge store for the DLM agent.
//!
//! The store holds (question, answer, category) triples, unique on question.
//! Rows are only ever inserted; there is no update or delete path.

pub mod error;
pub mod knowledge;
pub mod knowledge_db;
mod sqlite_runtime;

pub use error::{DbError, DbResult};
pub use knowledge::{KnowledgeEntry, KnowledgeRepository, StoredCategory};
pub use knowledge_db::KnowledgeDbPool;

// Re-export test helpers when running tests or when test-helpers feature is enabled
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
