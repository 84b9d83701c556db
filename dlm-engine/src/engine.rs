//! The engine facade: one `process` call per query.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use dlm_core::{Category, Mode, Settings};
use dlm_db::{KnowledgeDbPool, KnowledgeEntry, KnowledgeRepository};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::context::TurnContext;
use crate::embeddings::EmbeddingClient;
use crate::errors::{EngineError, EngineResult};
use crate::learning::{LearnOutcome, Trainer, learn};
use crate::matcher::{ConfidencePolicy, MatchResult, Matcher};
use crate::normalize::{NormalizedQuery, Normalizer, is_meta_word};
use crate::oracle::{EmbeddingOracle, NoopOracle, SimilarityOracle};
use crate::reasoning::entities::{NameLexicon, PersonRecognizer};
use crate::reasoning::units::UnitTable;
use crate::reasoning::{Reasoner, ReasoningOutcome};
use crate::respond;

/// What the agent says back.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A stored answer, phrased for its category.
    Answer(String),
    /// Learn mode: the trainer accepted the rendered answer.
    Confirmed(String),
    Learned { question: String, category: Category },
    AlreadyKnown,
    NothingLearned,
    /// Recall miss.
    NoMatch(String),
    Computed { outcome: ReasoningOutcome, text: String },
}

impl Reply {
    pub fn text(&self) -> String {
        match self {
            Self::Answer(text) | Self::NoMatch(text) | Self::Computed { text, .. } => text.clone(),
            Self::Confirmed(_) => "Great!".to_string(),
            Self::Learned { .. } => "I learned something new!".to_string(),
            Self::AlreadyKnown => "I already know an answer for that question.".to_string(),
            Self::NothingLearned => "Nothing learnt. Moving on.".to_string(),
        }
    }
}

/// Reply plus the reasoning narration, if it was asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub reply: Reply,
    pub reasoning: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub duplicates: usize,
    /// Lines without a `>>` separator or with an empty side.
    pub malformed: usize,
}

pub struct DlmEngine {
    db: KnowledgeDbPool,
    normalizer: Normalizer,
    matcher: Matcher,
    reasoner: Reasoner,
    rng: Mutex<StdRng>,
}

impl DlmEngine {
    /// Open the store named by the settings and wire up the oracle.
    pub async fn open(settings: &Settings) -> EngineResult<Self> {
        let oracle: Arc<dyn SimilarityOracle> = if settings.embedding.enabled {
            let client = EmbeddingClient::new(&settings.embedding);
            info!("Semantic matching via {}", client.model());
            Arc::new(EmbeddingOracle::new(client))
        } else {
            info!("Semantic matching disabled");
            Arc::new(NoopOracle)
        };

        let db_path = settings.db_path()?;
        let db = KnowledgeDbPool::open(&db_path).await?;
        Self::with_parts(settings, db, oracle)
    }

    /// Build from an already open store and a chosen oracle.
    pub fn with_parts(
        settings: &Settings,
        db: KnowledgeDbPool,
        oracle: Arc<dyn SimilarityOracle>,
    ) -> EngineResult<Self> {
        let names = match &settings.reasoning.names_path {
            Some(path) => NameLexicon::with_names_file(path)?,
            None => NameLexicon::builtin(),
        };
        let recognizers: Vec<Box<dyn PersonRecognizer>> = vec![Box::new(names)];
        let reasoner = Reasoner::new(UnitTable::standard(), recognizers, oracle.clone());

        Ok(Self {
            db,
            normalizer: Normalizer::new(reasoner.lexicon().clone()),
            matcher: Matcher::new(ConfidencePolicy::from(&settings.matching), oracle),
            reasoner,
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    /// Fix the template and fallback choices.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn normalize(&self, raw: &str, mode: Mode) -> NormalizedQuery {
        self.normalizer.normalize(raw, mode)
    }

    pub async fn lookup(&self) -> EngineResult<Vec<KnowledgeEntry>> {
        Ok(KnowledgeRepository::lookup_all(self.db.pool()).await?)
    }

    /// Insert-if-absent; the question is stored as given.
    pub async fn insert(&self, question: &str, answer: &str, category: Category) -> EngineResult<bool> {
        Ok(KnowledgeRepository::insert(self.db.pool(), question, answer, category).await?)
    }

    /// Answer, learn from, or compute one query.
    pub async fn process(
        &self,
        query: &str,
        mode: Mode,
        display_reasoning: bool,
        trainer: &mut dyn Trainer,
    ) -> EngineResult<Turn> {
        if query.trim().is_empty() {
            return Err(EngineError::EmptyInput);
        }
        let ctx = TurnContext {
            raw: query.to_string(),
            mode,
            display_reasoning,
            query: self.normalizer.normalize(query, mode),
        };
        debug!("{} query normalized to {:?}", mode, ctx.query.filtered());

        match mode {
            Mode::Compute => Ok(self.compute(&ctx).await),
            Mode::Recall | Mode::Learn => self.answer(&ctx, trainer).await,
        }
    }

    async fn compute(&self, ctx: &TurnContext) -> Turn {
        let solution = self.reasoner.solve(ctx).await;
        let text = match &solution.outcome {
            ReasoningOutcome::Ambiguous { .. } => format!(
                "{} {}",
                self.with_rng(|rng| respond::fallback(rng)),
                solution.outcome.message()
            ),
            outcome => outcome.message(),
        };
        Turn {
            reply: Reply::Computed {
                outcome: solution.outcome,
                text,
            },
            reasoning: solution.trace,
        }
    }

    async fn answer(&self, ctx: &TurnContext, trainer: &mut dyn Trainer) -> EngineResult<Turn> {
        let entries = KnowledgeRepository::lookup_all(self.db.pool()).await?;
        let result = self.matcher.find(&entries, &ctx.query).await;
        let reasoning = if ctx.display_reasoning {
            narrate_recall(&ctx.query, &result)
        } else {
            Vec::new()
        };

        if let Some(entry) = result.best.as_ref().filter(|_| result.confident) {
            let rendered = self.with_rng(|rng| respond::render(entry, rng));
            if ctx.mode != Mode::Learn {
                return Ok(Turn {
                    reply: Reply::Answer(rendered),
                    reasoning,
                });
            }
            if trainer.confirm(&rendered) {
                return Ok(Turn {
                    reply: Reply::Confirmed(rendered),
                    reasoning,
                });
            }
            debug!("trainer rejected the answer for {:?}", entry.question);
        }

        let reply = if ctx.mode == Mode::Learn {
            match learn(self.db.pool(), &ctx.query.stripped, trainer).await? {
                LearnOutcome::Learned { question, category } => Reply::Learned { question, category },
                LearnOutcome::AlreadyKnown => Reply::AlreadyKnown,
                LearnOutcome::NothingLearned => Reply::NothingLearned,
            }
        } else {
            Reply::NoMatch(self.with_rng(|rng| respond::fallback(rng)).to_string())
        };
        Ok(Turn { reply, reasoning })
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    /// Import a `question>>answer` flat file as generic entries.
    pub async fn import_legacy(&self, path: &Path) -> EngineResult<ImportSummary> {
        let contents = tokio::fs::read_to_string(path).await?;
        let mut summary = ImportSummary::default();

        for line in contents.lines().filter(|l| !l.trim().is_empty()) {
            let Some((question, answer)) = line.split_once(">>") else {
                summary.malformed += 1;
                continue;
            };
            let key = self.normalizer.normalize(question, Mode::Recall).stripped;
            let answer = answer.trim();
            if key.is_empty() || answer.is_empty() {
                summary.malformed += 1;
                continue;
            }
            if self.insert(&key, answer, Category::Generic).await? {
                summary.imported += 1;
            } else {
                summary.duplicates += 1;
            }
        }

        if summary.malformed > 0 {
            warn!("Skipped {} malformed lines in {}", summary.malformed, path.display());
        }
        info!(
            "Imported {} entries from {} ({} already known)",
            summary.imported,
            path.display(),
            summary.duplicates
        );
        Ok(summary)
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn percent(score: f64) -> u32 {
    (score * 100.0).floor() as u32
}

fn narrate_recall(query: &NormalizedQuery, result: &MatchResult) -> Vec<String> {
    let mut lines = Vec::new();
    let Some(first) = query.tokens.first() else {
        lines.push(
            "I couldn't pick out any context or clear topic. If I see a match in my database I will respond with that, or else I have no clue!"
                .to_string(),
        );
        return lines;
    };

    if query.stripped.is_empty() {
        lines.push(format!(
            "The user starts their query with \"{}\", but I couldn't pick out a clear topic or context.",
            title_case(first)
        ));
    } else {
        lines.push(format!(
            "The user starts their query with \"{}\" and they are asking about \"{}\".",
            title_case(first),
            title_case(&query.stripped)
        ));
        for meta in query.tokens.iter().filter(|t| is_meta_word(t)) {
            lines.push(format!(
                "It seems like they want a {} of \"{}\".",
                meta,
                title_case(&query.stripped)
            ));
        }
    }

    match result.best.as_ref().filter(|_| result.confident) {
        Some(entry) => {
            lines.push(format!(
                "Yes! I do remember learning about \"{}\" and I might have the right answer!",
                entry.question
            ));
            lines.push(format!(
                "Sequence matching against the closest question in my database found it {}% similar.",
                percent(result.edit_similarity)
            ));
            if let Some(semantic) = result.semantic_similarity {
                lines.push(format!(
                    "A vector analysis put it at {}% similar. There is room for error, but we will see.",
                    percent(semantic)
                ));
            }
        }
        None => {
            lines.push(format!(
                "The closest match is only {}% similar when I used sequence matching.",
                percent(result.edit_similarity)
            ));
            if let Some(semantic) = result.semantic_similarity {
                lines.push(format!(
                    "Furthermore, an in-depth vector analysis revealed a similarity percentage of {}%.",
                    percent(semantic)
                ));
            }
            lines.push(
                "I don't think I know the answer, so I am going to let the user know that."
                    .to_string(),
            );
        }
    }
    lines
}
