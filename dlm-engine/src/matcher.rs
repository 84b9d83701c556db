//! Best-match search over the knowledge store.
//!
//! Every stored question is scored by edit similarity against both the
//! filtered and the stripped query. Only when the best edit score misses the
//! threshold is the semantic oracle consulted, and only for that one
//! candidate.

use std::sync::Arc;

use dlm_core::MatchingSettings;
use dlm_db::KnowledgeEntry;
use tracing::debug;

use crate::normalize::NormalizedQuery;
use crate::oracle::SimilarityOracle;
use crate::similarity::edit_similarity;

/// When a best candidate counts as a confident answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidencePolicy {
    /// Inclusive.
    pub edit_threshold: f64,
    /// Exclusive.
    pub semantic_threshold: f64,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self::from(&MatchingSettings::default())
    }
}

impl From<&MatchingSettings> for ConfidencePolicy {
    fn from(settings: &MatchingSettings) -> Self {
        Self {
            edit_threshold: settings.edit_threshold,
            semantic_threshold: settings.semantic_threshold,
        }
    }
}

impl ConfidencePolicy {
    pub fn accepts_edit(&self, edit: f64) -> bool {
        edit >= self.edit_threshold
    }

    pub fn accepts_semantic(&self, semantic: Option<f64>) -> bool {
        semantic.is_some_and(|s| s > self.semantic_threshold)
    }

    pub fn is_confident(&self, edit: f64, semantic: Option<f64>) -> bool {
        self.accepts_edit(edit) || self.accepts_semantic(semantic)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub best: Option<KnowledgeEntry>,
    pub edit_similarity: f64,
    /// Absent when the oracle was not consulted or had no opinion.
    pub semantic_similarity: Option<f64>,
    pub confident: bool,
}

impl MatchResult {
    fn empty() -> Self {
        Self {
            best: None,
            edit_similarity: 0.0,
            semantic_similarity: None,
            confident: false,
        }
    }
}

pub struct Matcher {
    policy: ConfidencePolicy,
    oracle: Arc<dyn SimilarityOracle>,
}

impl Matcher {
    pub fn new(policy: ConfidencePolicy, oracle: Arc<dyn SimilarityOracle>) -> Self {
        Self { policy, oracle }
    }

    /// Highest-scoring entry by edit similarity; the earliest entry wins ties.
    pub fn scan<'a>(
        entries: &'a [KnowledgeEntry],
        query: &NormalizedQuery,
    ) -> Option<(&'a KnowledgeEntry, f64)> {
        let filtered = query.filtered();
        let mut best: Option<(&KnowledgeEntry, f64)> = None;
        for entry in entries {
            let score = edit_similarity(&entry.question, &filtered)
                .max(edit_similarity(&entry.question, &query.stripped));
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((entry, score));
            }
        }
        best
    }

    pub async fn find(&self, entries: &[KnowledgeEntry], query: &NormalizedQuery) -> MatchResult {
        let Some((entry, edit)) = Self::scan(entries, query) else {
            debug!("knowledge store is empty, nothing to match");
            return MatchResult::empty();
        };

        let semantic = if self.policy.accepts_edit(edit) {
            None
        } else {
            self.oracle.similarity(&query.stripped, &entry.question).await
        };
        let confident = self.policy.is_confident(edit, semantic);
        debug!(
            "best match {:?}: edit={:.3} semantic={:?} confident={}",
            entry.question, edit, semantic, confident
        );

        MatchResult {
            best: Some(entry.clone()),
            edit_similarity: edit,
            semantic_similarity: semantic,
            confident,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::NoopOracle;
    use async_trait::async_trait;
    use dlm_core::Category;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedOracle {
        score: Option<f64>,
        calls: AtomicUsize,
    }

    impl FixedOracle {
        fn new(score: Option<f64>) -> Arc<Self> {
            Arc::new(Self {
                score,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SimilarityOracle for FixedOracle {
        async fn similarity(&self, _a: &str, _b: &str) -> Option<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.score
        }
    }

    fn query(text: &str) -> NormalizedQuery {
        NormalizedQuery {
            tokens: text.split_whitespace().map(str::to_string).collect(),
            stripped: text.to_string(),
        }
    }

    fn entry(question: &str) -> KnowledgeEntry {
        KnowledgeEntry::new(question, "answer", Category::Generic)
    }

    #[test]
    fn test_confidence_boundaries() {
        let policy = ConfidencePolicy::default();
        assert!(!policy.is_confident(0.649, None));
        assert!(policy.is_confident(0.65, None));
        assert!(!policy.is_confident(0.0, Some(0.50)));
        assert!(policy.is_confident(0.0, Some(0.501)));
        assert!(policy.is_confident(0.65, Some(0.0)));
    }

    #[test]
    fn test_policy_follows_settings() {
        let policy = ConfidencePolicy::from(&MatchingSettings {
            edit_threshold: 0.9,
            semantic_threshold: 0.7,
        });
        assert!(!policy.is_confident(0.89, Some(0.7)));
        assert!(policy.is_confident(0.9, None));
    }

    #[tokio::test]
    async fn test_empty_store_is_not_confident() {
        let oracle = FixedOracle::new(Some(1.0));
        let matcher = Matcher::new(ConfidencePolicy::default(), oracle.clone());
        let result = matcher.find(&[], &query("fafsa")).await;
        assert!(result.best.is_none());
        assert!(!result.confident);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_edit_tier_skips_oracle() {
        let oracle = FixedOracle::new(Some(0.0));
        let matcher = Matcher::new(ConfidencePolicy::default(), oracle.clone());
        let entries = vec![entry("what fafsa deadline"), entry("how apply")];
        let result = matcher.find(&entries, &query("what fafsa deadline")).await;
        assert!(result.confident);
        assert_eq!(result.best.unwrap().question, "what fafsa deadline");
        assert_eq!(result.semantic_similarity, None);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_semantic_tier_rescues_weak_edit_match() {
        let oracle = FixedOracle::new(Some(0.8));
        let matcher = Matcher::new(ConfidencePolicy::default(), oracle.clone());
        let entries = vec![entry("fafsa deadline")];
        let result = matcher.find(&entries, &query("when student aid due")).await;
        assert!(result.edit_similarity < 0.65);
        assert_eq!(result.semantic_similarity, Some(0.8));
        assert!(result.confident);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_absent_oracle_leaves_weak_match_unconfident() {
        let matcher = Matcher::new(ConfidencePolicy::default(), Arc::new(NoopOracle));
        let entries = vec![entry("fafsa deadline")];
        let result = matcher.find(&entries, &query("library hours")).await;
        assert!(result.best.is_some());
        assert!(!result.confident);
    }

    #[test]
    fn test_ties_favor_first_entry() {
        let entries = vec![entry("abc"), entry("abc")];
        let (best, score) = Matcher::scan(&entries, &query("abc")).unwrap();
        assert!(std::ptr::eq(best, &entries[0]));
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_stripped_form_can_win() {
        let entries = vec![entry("photosynthesis")];
        let q = NormalizedQuery {
            tokens: vec!["definition".into(), "photosynthesis".into()],
            stripped: "photosynthesis".into(),
        };
        let (_, score) = Matcher::scan(&entries, &q).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_adding_entries_never_lowers_best_score() {
        let q = query("when fafsa due");
        let questions = ["library hours", "fafsa deadline", "zzz", "when fafsa due date", "a"];
        let mut entries = Vec::new();
        let mut previous = 0.0;
        for question in questions {
            entries.push(entry(question));
            let (_, score) = Matcher::scan(&entries, &q).unwrap();
            assert!(score >= previous, "{question}: {score} < {previous}");
            previous = score;
        }
    }
}
