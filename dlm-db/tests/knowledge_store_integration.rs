//! File-backed knowledge store tests: persistence across reopen and legacy
//! schema upgrade.

use dlm_core::Category;
use dlm_db::{KnowledgeDbPool, KnowledgeRepository, StoredCategory};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;

#[tokio::test]
async fn entries_survive_reopen() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("kb").join("dlm_database.db");

    let db = KnowledgeDbPool::open(&path).await.expect("open");
    KnowledgeRepository::insert(db.pool(), "fafsa", "federal student aid", Category::Definition)
        .await
        .unwrap();
    db.close().await;

    let reopened = KnowledgeDbPool::open(&path).await.expect("reopen");
    let entries = KnowledgeRepository::lookup_all(reopened.pool()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].question, "fafsa");
    assert_eq!(
        entries[0].category(),
        StoredCategory::Known(Category::Definition)
    );
    assert_eq!(reopened.path(), Some(path.as_path()));
}

#[tokio::test]
async fn legacy_table_gains_category_column() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("legacy.db");

    // Table layout from releases that predate categories
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);
    let legacy = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE knowledge_base (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question TEXT NOT NULL UNIQUE,
            answer TEXT NOT NULL
        )",
    )
    .execute(&legacy)
    .await
    .unwrap();
    sqlx::query("INSERT INTO knowledge_base (question, answer) VALUES ('old', 'answer')")
        .execute(&legacy)
        .await
        .unwrap();
    legacy.close().await;

    let db = KnowledgeDbPool::open(&path).await.expect("open legacy");
    let entries = KnowledgeRepository::lookup_all(db.pool()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].category(), StoredCategory::Missing);

    assert!(
        KnowledgeRepository::insert(db.pool(), "new", "answer", Category::Generic)
            .await
            .unwrap()
    );
    assert_eq!(KnowledgeRepository::count(db.pool()).await.unwrap(), 2);
}
