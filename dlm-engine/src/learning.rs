//! Interactive learning: ask a trainer for the expected answer and its
//! category, then insert-if-absent under the stripped query.

use dlm_core::Category;
use dlm_db::KnowledgeRepository;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::errors::EngineResult;

/// The human side of the learning workflow.
pub trait Trainer {
    /// Shown a rendered answer; `true` when it is what the trainer expected.
    fn confirm(&mut self, rendered: &str) -> bool;

    /// The answer that should have been given. `None` or blank learns nothing.
    fn expected_answer(&mut self) -> Option<String>;

    /// Category name for the new entry. Called again with a higher `attempt`
    /// after every invalid name; `None` means the trainer has gone away.
    fn category(&mut self, attempt: usize) -> Option<String>;
}

/// Trainer for sessions that never teach: confirms everything, offers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrainer;

impl Trainer for NoTrainer {
    fn confirm(&mut self, _rendered: &str) -> bool {
        true
    }

    fn expected_answer(&mut self) -> Option<String> {
        None
    }

    fn category(&mut self, _attempt: usize) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LearnOutcome {
    Learned { question: String, category: Category },
    /// Another writer stored this question first.
    AlreadyKnown,
    NothingLearned,
}

/// Run the workflow for one query. `key` is the stripped normalized query.
pub async fn learn(
    pool: &SqlitePool,
    key: &str,
    trainer: &mut dyn Trainer,
) -> EngineResult<LearnOutcome> {
    let key = key.trim();
    if key.is_empty() {
        debug!("nothing to learn under an empty key");
        return Ok(LearnOutcome::NothingLearned);
    }

    let Some(answer) = trainer
        .expected_answer()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
    else {
        return Ok(LearnOutcome::NothingLearned);
    };

    let mut attempt = 0;
    let category = loop {
        let Some(name) = trainer.category(attempt) else {
            info!("trainer gave up choosing a category for {:?}", key);
            return Ok(LearnOutcome::NothingLearned);
        };
        match name.parse::<Category>() {
            Ok(category) => break category,
            Err(err) => debug!("rejected category on attempt {}: {}", attempt, err),
        }
        attempt += 1;
    };

    if KnowledgeRepository::insert(pool, key, &answer, category).await? {
        Ok(LearnOutcome::Learned {
            question: key.to_string(),
            category,
        })
    } else {
        Ok(LearnOutcome::AlreadyKnown)
    }
}
