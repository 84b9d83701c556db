use dlm_core::Mode;

use crate::normalize::NormalizedQuery;

/// Everything one turn needs, computed once up front and passed by reference
/// through matching, rendering and reasoning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnContext {
    pub raw: String,
    pub mode: Mode,
    pub display_reasoning: bool,
    pub query: NormalizedQuery,
}

impl TurnContext {
    /// Raw query lower-cased and split on whitespace, surrounding punctuation trimmed.
    pub fn raw_tokens(&self) -> Vec<String> {
        self.raw
            .to_lowercase()
            .split_whitespace()
            .map(|t| {
                t.trim_matches(|c: char| c.is_ascii_punctuation() && c != '.')
                    .trim_end_matches('.')
                    .to_string()
            })
            .filter(|t| !t.is_empty())
            .collect()
    }
}
