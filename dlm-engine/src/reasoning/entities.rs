//! People and proper nouns mentioned in a word problem. Only used to narrate
//! the reasoning; the arithmetic never depends on them.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::errors::EngineResult;

/// Finds single-word person names in raw query text.
pub trait PersonRecognizer: Send + Sync {
    fn persons(&self, text: &str) -> Vec<String>;
}

const BUILTIN_NAMES: &[&str] = &[
    "aaron", "abby", "adam", "alex", "alice", "amy", "andrew", "anna", "anne", "ben", "beth",
    "betty", "bob", "brian", "carl", "carlos", "carol", "charlie", "chloe", "chris", "claire",
    "dan", "daniel", "david", "diana", "emily", "emma", "eric", "ethan", "eva", "frank", "fred",
    "george", "grace", "hannah", "harry", "helen", "henry", "isaac", "jack", "jacob", "jake",
    "james", "jane", "jason", "jen", "jenny", "jessica", "jill", "jim", "joe", "john", "jose",
    "julia", "kate", "katie", "kevin", "kim", "laura", "leo", "liam", "lily", "linda", "lisa",
    "lucy", "luis", "maria", "mark", "mary", "mia", "michael", "mike", "nancy", "nick", "noah",
    "olivia", "oscar", "paul", "peter", "rachel", "rob", "rosa", "ryan", "sam", "sara", "sarah",
    "sean", "sophia", "steve", "susan", "tim", "tom", "tony", "victor", "wendy", "zoe",
];

/// Name list lookup, optionally extended from a file with one name per line.
#[derive(Debug, Clone)]
pub struct NameLexicon {
    names: HashSet<String>,
}

impl NameLexicon {
    pub fn builtin() -> Self {
        Self {
            names: BUILTIN_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn with_names_file(path: &Path) -> EngineResult<Self> {
        let mut lexicon = Self::builtin();
        let contents = std::fs::read_to_string(path)?;
        let before = lexicon.names.len();
        lexicon.names.extend(
            contents
                .lines()
                .map(|line| line.trim().to_lowercase())
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        );
        debug!(
            "Loaded {} extra names from {}",
            lexicon.names.len() - before,
            path.display()
        );
        Ok(lexicon)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.names.contains(&word.to_lowercase())
    }
}

fn letters_only(token: &str) -> String {
    token.chars().filter(|c| c.is_ascii_alphabetic()).collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

impl PersonRecognizer for NameLexicon {
    fn persons(&self, text: &str) -> Vec<String> {
        let mut seen = Vec::new();
        for token in text.split_whitespace() {
            let word = letters_only(token).to_lowercase();
            if !word.is_empty() && self.names.contains(&word) {
                let name = capitalize(&word);
                if !seen.contains(&name) {
                    seen.push(name);
                }
            }
        }
        seen
    }
}

/// Who and what a query talks about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mentions {
    pub persons: Vec<String>,
    pub items: Vec<String>,
}

/// Persons from every recognizer, then capitalised non-initial words that are
/// not persons as proper-noun items.
pub fn find_mentions(text: &str, recognizers: &[&dyn PersonRecognizer]) -> Mentions {
    let mut persons: Vec<String> = Vec::new();
    for recognizer in recognizers {
        for name in recognizer.persons(text) {
            if !name.contains(' ') && !persons.contains(&name) {
                persons.push(name);
            }
        }
    }

    let mut items: Vec<String> = Vec::new();
    for token in text.split_whitespace().skip(1) {
        let word: String = token.chars().filter(|c| c.is_alphabetic()).collect();
        let starts_upper = word.chars().next().is_some_and(char::is_uppercase);
        if starts_upper && !persons.contains(&capitalize(&word)) && !items.contains(&word) {
            items.push(word);
        }
    }

    Mentions { persons, items }
}
