//! Operator lexicon: natural-language triggers for each arithmetic operator,
//! plus the lexical-root helper used for "same word" comparisons.

use std::collections::HashSet;
use std::fmt;

use super::units::UnitTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// Unit conversion, not arithmetic.
    Convert,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Convert => "=",
        }
    }

    /// Bare arithmetic symbols written directly in a query.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" | "−" => Some(Self::Subtract),
            "*" | "×" => Some(Self::Multiply),
            "/" | "÷" => Some(Self::Divide),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

const ADD_TRIGGERS: &[&str] = &[
    "add", "plus", "sum", "total", "combined", "together", "in all", "in total", "more",
    "increased by", "gain", "got", "collected", "received", "add up", "accumulate", "bring to",
    "rise by", "grow by", "earned", "pick",
];

const SUBTRACT_TRIGGERS: &[&str] = &[
    "subtract", "minus", "less", "difference", "left", "remain", "remaining", "take away",
    "remove", "lost", "gave", "spent", "give away", "deduct", "decrease by", "fell by",
    "drop by", "leftover", "popped", "ate", "paid", "sold", "sells", "used", "use", "took",
    "absent", "broke off",
];

const MULTIPLY_TRIGGERS: &[&str] = &[
    "multiply", "times", "multiplied by", "product", "each", "every", "such", "per box",
    "per row", "per hour", "per week", "half", "double", "triple", "quadruple", "quartet",
    "twice as many", "thrice as many", "x", "such box",
];

const DIVIDE_TRIGGERS: &[&str] = &[
    "divide", "divided by", "split", "shared equally", "per", "share", "shared", "equal parts",
    "equal groups", "ratio", "quotient", "for each", "out of", "for every", "into", "average",
];

/// Sentence-final phrases that usually announce the question rather than an
/// operation ("... how many are left in total").
pub const ENDING_PHRASES: &[&str] = &[
    "total", "all", "left", "leftover", "remaining", "altogether", "together", "each", "spend",
    "per", "sum", "combined", "add up", "accumulate", "bring to", "rise by", "grow by", "earned",
    "in all", "in total", "difference", "deduct", "decrease by", "fell by", "drop by", "ate",
    "multiply", "times", "product", "received", "pick", "paid", "gave", "pay", "split",
    "shared equally", "equal parts", "equal groups", "ratio", "quotient", "average", "out of",
    "into",
];

/// Trigger phrases grouped by operator, in detection priority order.
#[derive(Debug, Clone)]
pub struct OperatorLexicon {
    groups: Vec<(Operator, Vec<String>)>,
    words: HashSet<String>,
    phrases: HashSet<String>,
}

impl OperatorLexicon {
    /// Arithmetic triggers plus every unit name as a conversion trigger.
    pub fn standard(units: &UnitTable) -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let mut groups = vec![
            (Operator::Add, owned(ADD_TRIGGERS)),
            (Operator::Subtract, owned(SUBTRACT_TRIGGERS)),
            (Operator::Multiply, owned(MULTIPLY_TRIGGERS)),
            (Operator::Divide, owned(DIVIDE_TRIGGERS)),
        ];
        groups.push((Operator::Convert, units.spellings().map(str::to_string).collect()));

        let mut words = HashSet::new();
        let mut phrases = HashSet::new();
        for (_, triggers) in &groups {
            for trigger in triggers {
                if trigger.contains(' ') {
                    phrases.insert(trigger.clone());
                } else {
                    words.insert(trigger.clone());
                }
            }
        }

        Self {
            groups,
            words,
            phrases,
        }
    }

    /// `(operator, trigger)` pairs in priority order.
    pub fn entries(&self) -> impl Iterator<Item = (Operator, &str)> {
        self.groups
            .iter()
            .flat_map(|(op, triggers)| triggers.iter().map(move |t| (*op, t.as_str())))
    }

    /// Exact single-word trigger.
    pub fn is_trigger_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Multi-word trigger such as "out of".
    pub fn is_trigger_phrase(&self, phrase: &str) -> bool {
        self.phrases.contains(phrase)
    }
}

/// Crude lemma: lower-case, then strip common inflections so "miles" ~ "mile",
/// "inches" ~ "inch", "doubled" ~ "double", "remaining" ~ "remain".
pub fn lexical_root(word: &str) -> String {
    let w = word.trim().to_lowercase();
    if let Some(root) = irregular_root(&w) {
        return root.to_string();
    }
    let len = w.len();
    if !w.is_ascii() || len <= 3 {
        return w;
    }

    if len > 4 && (w.ends_with("ies") || w.ends_with("ied")) {
        return format!("{}y", &w[..len - 3]);
    }
    if len > 4
        && ["ches", "shes", "sses", "xes", "zes"]
            .iter()
            .any(|suffix| w.ends_with(suffix))
    {
        return w[..len - 2].to_string();
    }
    if w.ends_with('s') && !w.ends_with("ss") && !w.ends_with("us") && !w.ends_with("is") {
        return w[..len - 1].to_string();
    }
    if len > 5 && w.ends_with("ing") {
        return w[..len - 3].to_string();
    }
    if len > 4 && w.ends_with("ed") {
        let stem = &w[..len - 2];
        let keeps_e = stem.ends_with("bl")
            || stem.ends_with("pl")
            || stem.ends_with("id")
            || ["s", "v", "c", "u", "z"].iter().any(|s| stem.ends_with(s));
        return if keeps_e {
            format!("{stem}e")
        } else {
            stem.to_string()
        };
    }
    w
}

fn irregular_root(word: &str) -> Option<&'static str> {
    Some(match word {
        "feet" => "foot",
        "halves" | "halved" => "half",
        "paid" => "pay",
        "sold" => "sell",
        "spent" => "spend",
        "took" => "take",
        "gave" => "give",
        "ate" => "eat",
        "lost" => "lose",
        "got" => "get",
        _ => return None,
    })
}
