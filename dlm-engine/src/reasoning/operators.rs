//! Operator detection: map words of a compute query to arithmetic operators
//! (or conversion) through an ordered list of matching strategies.

use tracing::trace;

use crate::oracle::SimilarityOracle;
use crate::similarity::edit_similarity;

use super::lexicon::{ENDING_PHRASES, Operator, OperatorLexicon, lexical_root};
use super::numbers::{parse_digits, parse_number};

/// Semantic score needed by the semantic strategy.
pub const SEMANTIC_CUTOFF: f64 = 0.80;
/// Minimum edit similarity the semantic strategy also insists on.
pub const SEMANTIC_EDIT_FLOOR: f64 = 0.40;
/// Edit similarity that counts as a match on its own.
pub const EDIT_CUTOFF: f64 = 0.80;
/// Fallback pass: how close a word must be to an ending phrase.
pub const ENDING_PHRASE_CUTOFF: f64 = 0.50;
/// Fallback pass: how close that word must then be to a trigger.
pub const ENDING_OPERATOR_CUTOFF: f64 = 0.70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// Same word or same lexical root.
    Lexical,
    /// Semantically close and not wildly different in spelling.
    Semantic,
    /// Near-identical spelling.
    Edit,
}

const STRATEGIES: [Strategy; 3] = [Strategy::Lexical, Strategy::Semantic, Strategy::Edit];

/// Operators found in a query, in query order, with the trigger words behind them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    pub operators: Vec<Operator>,
    /// Title-cased triggers, first occurrence only.
    pub keywords: Vec<String>,
}

impl Detection {
    fn record(&mut self, op: Operator, keyword: &str) {
        self.operators.push(op);
        let keyword = title_case(keyword);
        if !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
    }
}

fn title_case(text: &str) -> String {
    text.split(' ')
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

/// A word or multi-word trigger phrase spanning `tokens[first..=last]`.
#[derive(Debug, Clone, PartialEq)]
struct ScanUnit {
    text: String,
    first: usize,
    last: usize,
}

impl ScanUnit {
    /// Whether numbers sit right before and right after this unit.
    fn between_numbers(&self, tokens: &[String]) -> bool {
        let is_number = |idx: usize| tokens.get(idx).is_some_and(|t| parse_number(t).is_some());
        self.first > 0 && is_number(self.first - 1) && is_number(self.last + 1)
    }
}

pub struct OperatorDetector<'a> {
    lexicon: &'a OperatorLexicon,
    oracle: &'a dyn SimilarityOracle,
}

impl<'a> OperatorDetector<'a> {
    pub fn new(lexicon: &'a OperatorLexicon, oracle: &'a dyn SimilarityOracle) -> Self {
        Self { lexicon, oracle }
    }

    /// Detect operators in filtered `tokens`.
    pub async fn detect(&self, tokens: &[String]) -> Detection {
        let units = self.scan_units(tokens);
        let mut detection = Detection::default();

        for unit in &units {
            if is_trailing_ending(unit, tokens.len()) {
                trace!("skipping trailing ending phrase {:?}", unit.text);
                continue;
            }
            if let Some(op) = Operator::from_symbol(&unit.text) {
                detection.record(op, &unit.text);
                continue;
            }
            if parse_digits(&unit.text).is_some() {
                continue;
            }
            if let Some((op, keyword)) = self.classify(unit, tokens).await {
                trace!("{:?} -> {} via {:?}", unit.text, op, keyword);
                detection.record(op, keyword);
            }
        }

        if detection.operators.is_empty() {
            self.ending_phrase_fallback(&units, tokens, &mut detection).await;
        }
        detection
    }

    /// Merge adjacent tokens that together spell a trigger phrase.
    fn scan_units(&self, tokens: &[String]) -> Vec<ScanUnit> {
        let mut units = Vec::with_capacity(tokens.len());
        let mut idx = 0;
        while idx < tokens.len() {
            let phrase_len = [3usize, 2].into_iter().find(|len| {
                idx + len <= tokens.len()
                    && self.lexicon.is_trigger_phrase(&tokens[idx..idx + len].join(" "))
            });
            let len = phrase_len.unwrap_or(1);
            units.push(ScanUnit {
                text: tokens[idx..idx + len].join(" "),
                first: idx,
                last: idx + len - 1,
            });
            idx += len;
        }
        units
    }

    async fn classify(&self, unit: &ScanUnit, tokens: &[String]) -> Option<(Operator, &'a str)> {
        for strategy in STRATEGIES {
            for (op, keyword) in self.lexicon.entries() {
                if !self.matches(strategy, &unit.text, keyword).await {
                    continue;
                }
                if let Some(op) = resolve(op, keyword, unit, tokens) {
                    return Some((op, keyword));
                }
            }
        }
        None
    }

    async fn matches(&self, strategy: Strategy, word: &str, keyword: &str) -> bool {
        match strategy {
            Strategy::Lexical => {
                word == keyword
                    || (!word.contains(' ')
                        && !keyword.contains(' ')
                        && lexical_root(word) == lexical_root(keyword))
            }
            Strategy::Semantic => {
                edit_similarity(keyword, word) > SEMANTIC_EDIT_FLOOR
                    && self
                        .oracle
                        .similarity(keyword, word)
                        .await
                        .is_some_and(|s| s > SEMANTIC_CUTOFF)
            }
            Strategy::Edit => edit_similarity(keyword, word) > EDIT_CUTOFF,
        }
    }

    /// Last resort when nothing matched: a word that resembles a sentence-final
    /// phrase ("in total", "left") is mapped to the first trigger it resembles.
    async fn ending_phrase_fallback(
        &self,
        units: &[ScanUnit],
        tokens: &[String],
        detection: &mut Detection,
    ) {
        for unit in units {
            let mut near_ending = false;
            for phrase in ENDING_PHRASES {
                if self
                    .phrase_similarity(phrase, &unit.text)
                    .await
                    .is_some_and(|s| s > ENDING_PHRASE_CUTOFF)
                {
                    near_ending = true;
                    break;
                }
            }
            if !near_ending {
                continue;
            }

            for (op, keyword) in self.lexicon.entries() {
                let close = self
                    .phrase_similarity(keyword, &unit.text)
                    .await
                    .is_some_and(|s| s > ENDING_OPERATOR_CUTOFF);
                if let Some(op) = close.then(|| resolve(op, keyword, unit, tokens)).flatten() {
                    trace!("fallback {:?} -> {} via {:?}", unit.text, op, keyword);
                    detection.record(op, keyword);
                    return;
                }
            }
        }
    }

    async fn phrase_similarity(&self, a: &str, b: &str) -> Option<f64> {
        if a == b {
            return Some(1.0);
        }
        self.oracle.similarity(a, b).await
    }
}

/// "average" adds (the division comes later); "out of" only divides when
/// this occurrence sits between two numbers.
fn resolve(op: Operator, keyword: &str, unit: &ScanUnit, tokens: &[String]) -> Option<Operator> {
    match keyword {
        "average" => Some(Operator::Add),
        "out of" if !unit.between_numbers(tokens) => None,
        _ => Some(op),
    }
}

/// Ending phrases in the last two positions announce the question, not an operation.
fn is_trailing_ending(unit: &ScanUnit, token_count: usize) -> bool {
    unit.last + 2 >= token_count && ENDING_PHRASES.contains(&unit.text.as_str())
}
