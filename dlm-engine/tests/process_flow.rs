//! End-to-end turns through `DlmEngine::process` against an in-memory store.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use dlm_core::{Category, Mode, Settings};
use dlm_db::test_helpers::create_test_knowledge_pool;
use dlm_engine::respond::FALLBACK_RESPONSES;
use dlm_engine::{
    DlmEngine, EngineError, ImportSummary, NoTrainer, NoopOracle, Reply, ReasoningOutcome,
    SimilarityOracle, Trainer,
};

#[derive(Default)]
struct ScriptedTrainer {
    accept: bool,
    answer: Option<String>,
    categories: VecDeque<String>,
    shown: Vec<String>,
}

impl ScriptedTrainer {
    fn teaching(answer: &str, categories: &[&str]) -> Self {
        Self {
            accept: false,
            answer: Some(answer.to_string()),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            shown: Vec::new(),
        }
    }
}

impl Trainer for ScriptedTrainer {
    fn confirm(&mut self, rendered: &str) -> bool {
        self.shown.push(rendered.to_string());
        self.accept
    }

    fn expected_answer(&mut self) -> Option<String> {
        self.answer.take()
    }

    fn category(&mut self, _attempt: usize) -> Option<String> {
        self.categories.pop_front()
    }
}

struct FixedOracle(f64);

#[async_trait]
impl SimilarityOracle for FixedOracle {
    async fn similarity(&self, _a: &str, _b: &str) -> Option<f64> {
        Some(self.0)
    }
}

async fn engine_with(oracle: Arc<dyn SimilarityOracle>) -> DlmEngine {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("dlm_engine=debug,warn")
        .with_test_writer()
        .try_init();

    let db = create_test_knowledge_pool().await.expect("in-memory store");
    DlmEngine::with_parts(&Settings::default(), db, oracle)
        .expect("engine")
        .with_seed(42)
}

async fn engine() -> DlmEngine {
    engine_with(Arc::new(NoopOracle)).await
}

#[tokio::test]
async fn learn_then_recall() {
    let engine = engine().await;
    let mut trainer = ScriptedTrainer::teaching("June 30th 2025", &["due date", "deadline"]);

    let turn = engine
        .process("What is the FAFSA deadline?", Mode::Learn, false, &mut trainer)
        .await
        .unwrap();
    assert_eq!(
        turn.reply,
        Reply::Learned {
            question: "what fafsa deadline".to_string(),
            category: Category::Deadline,
        }
    );
    assert!(trainer.shown.is_empty(), "nothing to confirm on an empty store");

    let turn = engine
        .process("what's the fafsa deadline", Mode::Recall, false, &mut NoTrainer)
        .await
        .unwrap();
    let Reply::Answer(text) = &turn.reply else {
        panic!("expected an answer, got {:?}", turn.reply);
    };
    assert!(text.contains("June 30th 2025"), "{text}");
    assert!(text.contains("\"fafsa\""), "{text}");
}

#[tokio::test]
async fn recall_miss_uses_fallback() {
    let engine = engine().await;
    let turn = engine
        .process("Where is the library?", Mode::Recall, false, &mut NoTrainer)
        .await
        .unwrap();
    let Reply::NoMatch(text) = &turn.reply else {
        panic!("expected a miss, got {:?}", turn.reply);
    };
    assert!(FALLBACK_RESPONSES.contains(&text.as_str()));
}

#[tokio::test]
async fn rejected_answer_falls_through_to_learning() {
    let engine = engine().await;
    engine
        .insert("what fafsa deadline", "June 30th 2025", Category::Generic)
        .await
        .unwrap();

    let mut accepting = ScriptedTrainer {
        accept: true,
        ..Default::default()
    };
    let turn = engine
        .process("What is the FAFSA deadline?", Mode::Learn, false, &mut accepting)
        .await
        .unwrap();
    assert_eq!(turn.reply, Reply::Confirmed("June 30th 2025".to_string()));
    assert_eq!(accepting.shown, vec!["June 30th 2025"]);

    // The key is taken, so teaching a new answer leaves the old one in place
    let mut rejecting = ScriptedTrainer::teaching("July 1st", &["generic"]);
    let turn = engine
        .process("What is the FAFSA deadline?", Mode::Learn, false, &mut rejecting)
        .await
        .unwrap();
    assert_eq!(turn.reply, Reply::AlreadyKnown);

    let entries = engine.lookup().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].answer, "June 30th 2025");
}

#[tokio::test]
async fn blank_expectation_learns_nothing() {
    let engine = engine().await;
    let mut trainer = ScriptedTrainer::teaching("", &["generic"]);
    let turn = engine
        .process("How do I apply?", Mode::Learn, false, &mut trainer)
        .await
        .unwrap();
    assert_eq!(turn.reply, Reply::NothingLearned);
    assert_eq!(turn.reply.text(), "Nothing learnt. Moving on.");
    assert!(engine.lookup().await.unwrap().is_empty());
}

#[tokio::test]
async fn semantic_oracle_rescues_rephrased_question() {
    let question = "When is student aid due?";

    let semantic_engine = engine_with(Arc::new(FixedOracle(0.9))).await;
    semantic_engine
        .insert("fafsa deadline", "June 30th 2025", Category::Deadline)
        .await
        .unwrap();
    let turn = semantic_engine
        .process(question, Mode::Recall, true, &mut NoTrainer)
        .await
        .unwrap();
    assert!(matches!(&turn.reply, Reply::Answer(text) if text.contains("June 30th 2025")));
    assert!(turn.reasoning.iter().any(|l| l.contains("90%")));

    let engine = engine().await;
    engine
        .insert("fafsa deadline", "June 30th 2025", Category::Deadline)
        .await
        .unwrap();
    let turn = engine
        .process(question, Mode::Recall, false, &mut NoTrainer)
        .await
        .unwrap();
    assert!(matches!(turn.reply, Reply::NoMatch(_)));
}

#[tokio::test]
async fn compute_mode_never_touches_the_store() {
    let engine = engine().await;
    let turn = engine
        .process("What is 4 plus 5", Mode::Compute, true, &mut NoTrainer)
        .await
        .unwrap();
    let Reply::Computed { outcome, text } = &turn.reply else {
        panic!("expected a computation, got {:?}", turn.reply);
    };
    assert_eq!(outcome.value(), Some(9.0));
    assert_eq!(text, "Arithmetic Answer: 4 + 5 = 9");
    assert!(!turn.reasoning.is_empty());
    assert!(engine.lookup().await.unwrap().is_empty());
}

#[tokio::test]
async fn compute_examples() {
    let engine = engine().await;

    let turn = engine
        .process("Convert 2 miles to kilometers", Mode::Compute, false, &mut NoTrainer)
        .await
        .unwrap();
    let Reply::Computed { outcome, .. } = &turn.reply else {
        panic!("expected a computation, got {:?}", turn.reply);
    };
    assert!((outcome.value().unwrap() - 3.218688).abs() < 1e-6);

    let turn = engine
        .process(
            "area of a triangle with base 4 and height 5",
            Mode::Compute,
            false,
            &mut NoTrainer,
        )
        .await
        .unwrap();
    let Reply::Computed { outcome, .. } = &turn.reply else {
        panic!("expected a computation, got {:?}", turn.reply);
    };
    assert_eq!(outcome.value(), Some(10.0));
    assert!(turn.reasoning.is_empty());

    let turn = engine
        .process(
            "What is twenty five minus three.",
            Mode::Compute,
            false,
            &mut NoTrainer,
        )
        .await
        .unwrap();
    assert_eq!(turn.reply.text(), "Arithmetic Answer: 25 - 3 = 22");
}

#[tokio::test]
async fn ambiguous_compute_leads_with_fallback() {
    let engine = engine().await;
    let turn = engine
        .process("2 plus minus 3", Mode::Compute, false, &mut NoTrainer)
        .await
        .unwrap();
    let Reply::Computed { outcome, text } = &turn.reply else {
        panic!("expected a computation, got {:?}", turn.reply);
    };
    assert!(matches!(outcome, ReasoningOutcome::Ambiguous { .. }));
    assert!(FALLBACK_RESPONSES.iter().any(|f| text.starts_with(f)), "{text}");
    assert!(text.contains("\"Plus\" and \"Minus\""));
}

#[tokio::test]
async fn blank_query_is_rejected() {
    let engine = engine().await;
    let err = engine
        .process("   ", Mode::Recall, false, &mut NoTrainer)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::EmptyInput));
}

#[tokio::test]
async fn insert_is_idempotent_and_verbatim() {
    let engine = engine().await;
    assert!(engine.insert("Q One", "first", Category::Generic).await.unwrap());
    assert!(!engine.insert("Q One", "second", Category::YesNo).await.unwrap());

    let entries = engine.lookup().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].question, "Q One");
    assert_eq!(entries[0].answer, "first");
    assert_eq!(entries[0].category_text, "generic");
}

#[tokio::test]
async fn legacy_file_import() {
    let engine = engine().await;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "What is FAFSA?>>Free Application for Federal Student Aid").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "no separator here").unwrap();
    writeln!(file, "what is fafsa>>a duplicate").unwrap();
    writeln!(file, "the>>only filler words").unwrap();

    let summary = engine.import_legacy(file.path()).await.unwrap();
    assert_eq!(
        summary,
        ImportSummary {
            imported: 1,
            duplicates: 1,
            malformed: 2,
        }
    );

    let entries = engine.lookup().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].question, "what fafsa");
    assert_eq!(
        entries[0].question,
        engine.normalize("What is FAFSA?", Mode::Recall).stripped
    );
    assert_eq!(entries[0].answer, "Free Application for Federal Student Aid");
}
