//! Query normalization: lower-case, strip punctuation, drop filler words,
//! de-duplicate.

use std::collections::HashSet;
use std::sync::LazyLock;

use dlm_core::Mode;

use crate::reasoning::lexicon::OperatorLexicon;
use crate::reasoning::numbers::parse_number;

/// Kept in compute mode. A `.` is kept separately, and only as a decimal point.
const COMPUTE_SYMBOLS: &[char] = &['+', '-', '*', '/', '='];

/// Interrogatives, auxiliaries and modals survive when they open the query.
const LEADING_EXCEPTIONS: &[&str] = &[
    "who", "whom", "whose", "what", "which", "when", "where", "why", "is", "are", "am", "was",
    "were", "do", "does", "did", "have", "has", "had", "can", "could", "will", "would", "shall",
    "should", "may", "might", "must", "show", "list", "give", "how", "i",
];

/// Removed from the stripped variant so they don't dominate embeddings.
const META_WORDS: &[&str] = &[
    "definition",
    "explanation",
    "description",
    "comparison",
    "calculation",
    "translation",
    "meaning",
];

const FILLER_WORDS: &[&str] = &[
    // determiners
    "the", "some", "any", "many", "every", "each", "either", "neither", "this", "that", "these",
    "those", "certain", "another", "such", "whatsoever", "whichever", "whomever", "whatever", "all",
    "something", "possible",
    // pronouns
    "i", "me", "my", "mine", "here", "myself", "you", "your", "yours", "yourself", "he", "him",
    "his", "himself", "she", "her", "hers", "herself", "it", "its", "itself", "we", "us", "our",
    "ours", "ourselves", "they", "them", "their", "theirs", "themselves", "who", "whom", "whose",
    "which", "someone", "somebody", "anyone", "anybody", "everyone", "everybody", "nobody",
    "people", "person", "whoever", "wherever", "whenever", "whosoever", "others", "oneself",
    // auxiliaries
    "get", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "best", "do", "does", "did", "doing", "shall", "should", "will", "would", "can", "could", "may",
    "might", "must", "bad", "dare", "need", "want", "used", "shallnt", "shouldve", "wouldve",
    "couldve", "mustve", "mightve", "mustnt", "good",
    // conjunctions
    "and", "but", "or", "gotten", "nor", "so", "for", "yet", "although", "though", "because",
    "since", "unless", "while", "whereas", "both", "whether", "not", "if", "common", "therefore",
    "thus", "hence", "meanwhile", "besides", "furthermore",
    // prepositions
    "about", "above", "across", "after", "against", "along", "among", "around", "as", "at",
    "before", "behind", "below", "beneath", "beside", "between", "beyond", "by", "low", "high",
    "despite", "down", "during", "happen", "except", "from", "in", "inside", "into", "like", "near",
    "off", "on", "onto", "out", "outside", "over", "past", "through", "throughout", "till", "to",
    "toward", "under", "underneath", "until", "up", "upon", "with", "within", "without",
    "concerning", "regarding",
    // adverbs
    "way", "ways", "again", "already", "also", "always", "ever", "never", "just", "now", "often",
    "once", "only", "quite", "rather", "really", "seldom", "sometimes", "soon", "got", "still",
    "then", "there", "too", "very", "well", "anytime", "hardly", "barely", "scarcely", "seriously",
    "truly", "frankly", "honestly", "basically", "literally", "definitely", "obviously", "surely",
    "likely", "probably", "certainly", "clearly", "undoubtedly",
    // question words
    "what", "when", "where", "why", "how", "however", "whence",
    // spoken fillers
    "gonna", "wanna", "gotta", "lemme", "dunno", "kinda", "sorta", "aint", "ya", "yeah", "nah",
    "um", "uh", "hmm", "huh", "mmm", "uhh", "ahh", "err", "ugh", "tsk", "okay", "ok", "alright",
    "yo", "bruh", "dude", "bro", "sis", "mate", "fam", "yup", "nope", "welp",
    // question verbs
    "go", "dont", "cant", "couldnt", "shouldnt", "wouldnt", "use", "tell", "thinking", "please",
    "say", "let", "know", "consider", "find", "show", "take", "working", "list", "give", "provide",
    "make", "see", "mean", "understand", "stay", "look", "care", "work",
    // contractions
    "ill", "im", "ive", "youd", "youll", "youre", "youve", "hed", "hell", "hes", "shed", "shell",
    "shes", "wed", "weve", "theyd", "theyll", "theyre", "theyve", "thats", "whos", "whats",
    "wheres", "whens", "whys", "hows", "theres", "heres", "lets",
    // conversational
    "actually", "apparently", "most", "mostly", "mainly", "typically", "essentially", "generally",
    "approximately", "virtually", "kind", "sort", "type",
    // slang
    "lol", "lmao", "rofl", "omg", "idk", "fyi", "btw", "imo", "smh", "afk", "ttyl", "brb", "thx",
    "pls", "ppl", "u", "ur", "r", "cuz", "coz", "cause", "gimme", "wassup", "sup",
    // placeholders
    "thing", "stuff", "thingy", "whatchamacallit", "doohickey", "thingamajig", "thingamabob",
    // empty qualifiers
    "important", "necessary", "specific", "particular", "special", "exactly", "precisely",
    "recently", "currently", "today", "tomorrow", "yesterday", "later", "eventually", "sometime",
    "anyway", "moreover",
];

static FILLERS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| FILLER_WORDS.iter().copied().collect());

/// Output of [`Normalizer::normalize`]. Either form may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub tokens: Vec<String>,
    /// Filtered form with meta-words removed, used for embedding comparisons
    /// and as the learning key.
    pub stripped: String,
}

impl NormalizedQuery {
    /// Filtered tokens joined by single spaces.
    pub fn filtered(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    lexicon: OperatorLexicon,
}

impl Normalizer {
    pub fn new(lexicon: OperatorLexicon) -> Self {
        Self { lexicon }
    }

    pub fn normalize(&self, raw: &str, mode: Mode) -> NormalizedQuery {
        let compute = mode == Mode::Compute;
        let cleaned = strip_punctuation(&raw.to_lowercase(), compute);
        let words: Vec<&str> = cleaned.split_whitespace().collect();

        let mut kept: Vec<(&str, bool)> = Vec::with_capacity(words.len());
        for (idx, &word) in words.iter().enumerate() {
            let trigger = self.lexicon.is_trigger_word(word)
                || (compute && self.in_trigger_phrase(&words, idx));
            if idx == 0 && LEADING_EXCEPTIONS.contains(&word) {
                kept.push((word, trigger));
            } else if !FILLERS.contains(word) || (compute && trigger) {
                kept.push((word, trigger));
            }
        }

        let mut seen = HashSet::new();
        let tokens: Vec<String> = kept
            .into_iter()
            .filter(|(word, trigger)| *trigger || is_numeric(word) || seen.insert(*word))
            .map(|(word, _)| word.to_string())
            .collect();

        let stripped = tokens
            .iter()
            .filter(|t| !is_meta_word(t))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        NormalizedQuery { tokens, stripped }
    }

    /// Whether `words[idx]` belongs to a multi-word trigger phrase spelled out
    /// by its neighbours ("out of", "take away").
    fn in_trigger_phrase(&self, words: &[&str], idx: usize) -> bool {
        [2usize, 3].into_iter().any(|len| {
            let first = idx.saturating_sub(len - 1);
            (first..=idx).any(|start| {
                start + len <= words.len()
                    && self.lexicon.is_trigger_phrase(&words[start..start + len].join(" "))
            })
        })
    }
}

/// Words like "definition" that name the kind of answer wanted.
pub fn is_meta_word(word: &str) -> bool {
    META_WORDS.contains(&word)
}

fn strip_punctuation(text: &str, compute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let keep = !c.is_ascii_punctuation()
            || (compute && COMPUTE_SYMBOLS.contains(&c))
            || (compute && c == '.' && chars.peek().is_some_and(char::is_ascii_digit));
        if keep {
            out.push(c);
        }
    }
    out
}

fn is_numeric(word: &str) -> bool {
    parse_number(word).is_some() || word.parse::<f64>().is_ok()
}
