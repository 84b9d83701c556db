//! dlm-engine: normalization, matching, answer phrasing, learning and the
//! compute-mode reasoner behind the DLM agent.

pub mod context;
pub mod embeddings;
pub mod engine;
pub mod errors;
pub mod learning;
pub mod matcher;
pub mod normalize;
pub mod oracle;
pub mod reasoning;
pub mod respond;
pub mod similarity;

pub use context::TurnContext;
pub use engine::{DlmEngine, ImportSummary, Reply, Turn};
pub use errors::{EngineError, EngineResult};
pub use learning::{LearnOutcome, NoTrainer, Trainer};
pub use matcher::{ConfidencePolicy, MatchResult, Matcher};
pub use normalize::{NormalizedQuery, Normalizer};
pub use oracle::{EmbeddingOracle, NoopOracle, SimilarityOracle};
pub use reasoning::{Reasoner, ReasoningOutcome, Solution};
