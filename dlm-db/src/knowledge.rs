//! Knowledge entry storage: select-all and insert-if-absent.

use dlm_core::Category;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// One learned (question, answer, category) triple.
///
/// `category` is kept as the raw stored text so rows written by other tools
/// can still be read; use [`KnowledgeEntry::category`] to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
    #[sqlx(rename = "category")]
    #[serde(rename = "category")]
    pub category_text: String,
}

/// Interpretation of a stored category column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredCategory {
    Known(Category),
    /// Empty column, e.g. a row from before categories existed.
    Missing,
    /// Non-empty text outside the category set.
    Unrecognized(String),
}

impl KnowledgeEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, category: Category) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            category_text: category.as_str().to_string(),
        }
    }

    pub fn category(&self) -> StoredCategory {
        let text = self.category_text.trim();
        if text.is_empty() {
            return StoredCategory::Missing;
        }
        match text.parse::<Category>() {
            Ok(category) => StoredCategory::Known(category),
            Err(_) => StoredCategory::Unrecognized(text.to_string()),
        }
    }
}

/// Knowledge repository for database operations
pub struct KnowledgeRepository;

impl KnowledgeRepository {
    /// All entries in insertion order.
    pub async fn lookup_all(pool: &SqlitePool) -> DbResult<Vec<KnowledgeEntry>> {
        let entries = sqlx::query_as::<_, KnowledgeEntry>(
            "SELECT question, answer, category FROM knowledge_base ORDER BY rowid ASC",
        )
        .fetch_all(pool)
        .await?;

        debug!("Loaded {} knowledge entries", entries.len());
        Ok(entries)
    }

    /// Insert a new entry unless the question is already known.
    ///
    /// The first writer wins: an existing row keeps its answer and category.
    /// Returns `true` when a row was written. The question is stored exactly
    /// as given.
    pub async fn insert(
        pool: &SqlitePool,
        question: &str,
        answer: &str,
        category: Category,
    ) -> DbResult<bool> {
        if question.trim().is_empty() {
            return Err(DbError::EmptyQuestion);
        }

        let result = sqlx::query(
            "INSERT OR IGNORE INTO knowledge_base (question, answer, category) VALUES (?, ?, ?)",
        )
        .bind(question)
        .bind(answer)
        .bind(category.as_str())
        .execute(pool)
        .await?;

        let inserted = result.rows_affected() == 1;
        if inserted {
            info!("Learned new entry for question: {}", question);
        } else {
            debug!("Question already known, insert ignored: {}", question);
        }
        Ok(inserted)
    }

    /// Exact lookup by question key
    pub async fn get_by_question(
        pool: &SqlitePool,
        question: &str,
    ) -> DbResult<Option<KnowledgeEntry>> {
        let entry = sqlx::query_as::<_, KnowledgeEntry>(
            "SELECT question, answer, category FROM knowledge_base WHERE question = ? LIMIT 1",
        )
        .bind(question)
        .fetch_optional(pool)
        .await?;

        Ok(entry)
    }

    /// Number of stored entries
    pub async fn count(pool: &SqlitePool) -> DbResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM knowledge_base")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_knowledge_pool;

    #[tokio::test]
    async fn test_insert_then_lookup_roundtrip() {
        let db = create_test_knowledge_pool().await.unwrap();
        let pool = db.pool();

        let inserted = KnowledgeRepository::insert(
            pool,
            "fafsa deadline",
            "June 30th 2025",
            Category::Deadline,
        )
        .await
        .unwrap();
        assert!(inserted);

        let entries = KnowledgeRepository::lookup_all(pool).await.unwrap();
        assert_eq!(
            entries,
            vec![KnowledgeEntry::new(
                "fafsa deadline",
                "June 30th 2025",
                Category::Deadline
            )]
        );
    }

    #[tokio::test]
    async fn test_insert_is_first_writer_wins() {
        let db = create_test_knowledge_pool().await.unwrap();
        let pool = db.pool();

        assert!(
            KnowledgeRepository::insert(pool, "fafsa", "first", Category::Generic)
                .await
                .unwrap()
        );
        assert!(
            !KnowledgeRepository::insert(pool, "fafsa", "second", Category::YesNo)
                .await
                .unwrap()
        );

        let entries = KnowledgeRepository::lookup_all(pool).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].answer, "first");
        assert_eq!(entries[0].category(), StoredCategory::Known(Category::Generic));
    }

    #[tokio::test]
    async fn test_insert_stores_question_verbatim() {
        let db = create_test_knowledge_pool().await.unwrap();
        let pool = db.pool();

        KnowledgeRepository::insert(pool, "  What IS Fafsa?", "aid", Category::Generic)
            .await
            .unwrap();

        let entry = KnowledgeRepository::get_by_question(pool, "  What IS Fafsa?")
            .await
            .unwrap()
            .expect("stored verbatim");
        assert_eq!(entry.answer, "aid");
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_question() {
        let db = create_test_knowledge_pool().await.unwrap();
        let err = KnowledgeRepository::insert(db.pool(), "   ", "x", Category::Generic)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::EmptyQuestion));
        assert_eq!(KnowledgeRepository::count(db.pool()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_lookup_preserves_insertion_order() {
        let db = create_test_knowledge_pool().await.unwrap();
        let pool = db.pool();

        for question in ["zeta", "alpha", "mid"] {
            KnowledgeRepository::insert(pool, question, "a", Category::Generic)
                .await
                .unwrap();
        }

        let questions: Vec<String> = KnowledgeRepository::lookup_all(pool)
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.question)
            .collect();
        assert_eq!(questions, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_stored_category_interpretation() {
        let mut entry = KnowledgeEntry::new("q", "a", Category::Process);
        assert_eq!(entry.category(), StoredCategory::Known(Category::Process));

        entry.category_text = String::new();
        assert_eq!(entry.category(), StoredCategory::Missing);

        entry.category_text = "recipe".to_string();
        assert_eq!(
            entry.category(),
            StoredCategory::Unrecognized("recipe".to_string())
        );
    }
}
