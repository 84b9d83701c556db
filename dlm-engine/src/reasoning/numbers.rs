//! Number recognition: digits, number words, and a small closed vocabulary
//! ("half", "double", ...). Also the initial-quantity anchor.

use std::sync::LazyLock;

use regex::Regex;

use super::lexicon::lexical_root;

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("digit pattern is valid"));

/// Words that mark the starting amount of a word problem.
const INITIAL_INDICATORS: &[&str] = &[
    "original", "originally", "initial", "initially", "had", "savings", "saving", "of",
];

/// Plain numeral such as `12` or `3.5`.
pub fn parse_digits(token: &str) -> Option<f64> {
    if DIGITS.is_match(token) {
        token.parse().ok()
    } else {
        None
    }
}

fn small_number(word: &str) -> Option<u64> {
    Some(match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    })
}

fn magnitude(word: &str) -> Option<u64> {
    Some(match word {
        "thousand" => 1_000,
        "million" => 1_000_000,
        "billion" => 1_000_000_000,
        _ => return None,
    })
}

/// Spelled-out cardinal ("twenty-five", "three hundred and two"), or a numeral.
pub fn words_to_number(text: &str) -> Option<f64> {
    let text = text.trim().to_lowercase();
    if let Some(value) = parse_digits(&text) {
        return Some(value);
    }

    let mut total: u64 = 0;
    let mut current: u64 = 0;
    let mut seen = false;
    for word in text
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| !w.is_empty())
    {
        if word == "and" && seen {
            continue;
        }
        if let Some(value) = small_number(word) {
            current = current.checked_add(value)?;
        } else if word == "hundred" {
            current = current.max(1).checked_mul(100)?;
        } else if let Some(scale) = magnitude(word) {
            total = total.checked_add(current.max(1).checked_mul(scale)?)?;
            current = 0;
        } else {
            return None;
        }
        seen = true;
    }

    seen.then(|| (total + current) as f64)
}

/// Digits first, then number words.
pub fn parse_number(token: &str) -> Option<f64> {
    parse_digits(token).or_else(|| words_to_number(token))
}

fn closed_vocabulary(token: &str, conversion: bool) -> Option<f64> {
    match lexical_root(token).as_str() {
        "half" => Some(0.5),
        "double" => Some(2.0),
        "triple" => Some(3.0),
        "quadruple" => Some(4.0),
        "a" | "an" if conversion => Some(1.0),
        _ => None,
    }
}

/// A number read from `tokens[start..=end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberSpan {
    pub value: f64,
    pub start: usize,
    pub end: usize,
}

impl NumberSpan {
    fn single(value: f64, idx: usize) -> Self {
        Self {
            value,
            start: idx,
            end: idx,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordClass {
    Unit,
    Teen,
    Tens,
    Hundred,
    Magnitude,
}

fn word_class(word: &str) -> Option<WordClass> {
    if word == "hundred" {
        return Some(WordClass::Hundred);
    }
    if magnitude(word).is_some() {
        return Some(WordClass::Magnitude);
    }
    Some(match small_number(word)? {
        1..=9 => WordClass::Unit,
        0 | 10..=19 => WordClass::Teen,
        _ => WordClass::Tens,
    })
}

/// Whether a number word of class `next` extends one ending in `prev`.
fn extends(prev: WordClass, next: WordClass) -> bool {
    use WordClass::*;
    matches!(
        (prev, next),
        (Tens, Unit)
            | (Unit | Teen | Tens, Hundred)
            | (Unit | Teen | Tens | Hundred, Magnitude)
            | (Hundred | Magnitude, Unit | Teen | Tens)
    )
}

/// Classes of a token's first and last word ("twenty-five" is Tens..Unit).
fn token_classes(token: &str) -> Option<(WordClass, WordClass)> {
    let mut parts = token.split('-');
    let first = word_class(parts.next()?)?;
    let mut last = first;
    for part in parts {
        let class = word_class(part)?;
        if !extends(last, class) {
            return None;
        }
        last = class;
    }
    Some((first, last))
}

/// Numerals and runs of number words, in token order.
///
/// Adjacent number words form one number when they read as one ("twenty
/// five", "three hundred and two"); "five three" stays two numbers.
pub fn number_spans(tokens: &[String]) -> Vec<NumberSpan> {
    let mut spans = Vec::new();
    let mut idx = 0;
    while idx < tokens.len() {
        if let Some(value) = parse_digits(&tokens[idx]) {
            spans.push(NumberSpan::single(value, idx));
            idx += 1;
            continue;
        }
        let Some((_, mut last)) = token_classes(&tokens[idx]) else {
            idx += 1;
            continue;
        };

        let mut end = idx;
        loop {
            let mut next = end + 1;
            if matches!(last, WordClass::Hundred | WordClass::Magnitude)
                && tokens.get(next).is_some_and(|t| t == "and")
            {
                next += 1;
            }
            match tokens.get(next).and_then(|t| token_classes(t)) {
                Some((first, out)) if extends(last, first) => {
                    end = next;
                    last = out;
                }
                _ => break,
            }
        }

        if let Some(value) = words_to_number(&tokens[idx..=end].join(" ")) {
            spans.push(NumberSpan {
                value,
                start: idx,
                end,
            });
        }
        idx = end + 1;
    }
    spans
}

/// Numbers in token order, closed vocabulary included.
///
/// With `conversion` set, "a"/"an" count as one ("convert a mile to feet"),
/// but only while no other number is present.
pub fn extract_numbers(tokens: &[String], conversion: bool) -> Vec<NumberSpan> {
    let mut numbers = number_spans(tokens);
    let mut article = None;
    for (idx, token) in tokens.iter().enumerate() {
        if numbers.iter().any(|n| (n.start..=n.end).contains(&idx)) {
            continue;
        }
        if let Some(value) = closed_vocabulary(token, conversion) {
            if article.is_none() && matches!(token.as_str(), "a" | "an") {
                article = Some(idx);
            }
            numbers.push(NumberSpan::single(value, idx));
        }
    }
    numbers.sort_by_key(|n| n.start);
    if numbers.len() > 1 {
        if let Some(idx) = article {
            numbers.retain(|n| n.start != idx);
        }
    }
    numbers
}

/// Move the number next to an initial-quantity word ("had 12", "savings of 40")
/// to the front. The last indicator in the sentence wins. "of" only looks
/// forward and is ignored inside "out of".
pub fn anchor_initial_quantity(raw_tokens: &[String], numbers: &mut Vec<f64>) -> Option<f64> {
    let spans = number_spans(raw_tokens);
    let mut anchor = None;
    for (idx, token) in raw_tokens.iter().enumerate() {
        if !INITIAL_INDICATORS.contains(&token.as_str()) {
            continue;
        }
        let is_of = token == "of";
        if is_of && idx > 0 && raw_tokens[idx - 1] == "out" {
            continue;
        }
        if !is_of && idx > 0 {
            if let Some(span) = spans.iter().find(|s| s.end + 1 == idx) {
                anchor = Some(span.value);
            }
        }
        if let Some(span) = spans.iter().find(|s| s.start == idx + 1) {
            anchor = Some(span.value);
        }
    }

    let value = anchor?;
    let position = numbers.iter().position(|n| *n == value)?;
    let moved = numbers.remove(position);
    numbers.insert(0, moved);
    Some(moved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_words_to_number() {
        assert_eq!(words_to_number("five"), Some(5.0));
        assert_eq!(words_to_number("twenty-five"), Some(25.0));
        assert_eq!(words_to_number("three hundred and two"), Some(302.0));
        assert_eq!(words_to_number("two thousand five hundred"), Some(2500.0));
        assert_eq!(words_to_number("12"), Some(12.0));
        assert_eq!(words_to_number("apples"), None);
        assert_eq!(words_to_number("and"), None);
        assert_eq!(words_to_number(""), None);
    }

    #[test]
    fn test_digits_reject_words_like_inf() {
        assert_eq!(parse_digits("3.5"), Some(3.5));
        assert_eq!(parse_digits("inf"), None);
        assert_eq!(parse_digits("-4"), None);
    }

    fn values(text: &str, conversion: bool) -> Vec<f64> {
        extract_numbers(&tokens(text), conversion)
            .iter()
            .map(|n| n.value)
            .collect()
    }

    #[test]
    fn test_extract_closed_vocabulary() {
        assert_eq!(values("double 4 apples", false), vec![2.0, 4.0]);
        assert_eq!(values("halves of 10", false), vec![0.5, 10.0]);
    }

    #[test]
    fn test_article_counts_only_for_lonely_conversion() {
        assert_eq!(values("convert a mile feet", true), vec![1.0]);
        assert_eq!(values("convert a 2 mile feet", true), vec![2.0]);
        assert!(values("a mile", false).is_empty());
    }

    #[test]
    fn test_number_words_join_into_one_number() {
        assert_eq!(values("twenty five minus three", false), vec![25.0, 3.0]);
        assert_eq!(values("three hundred and two apples", false), vec![302.0]);
        assert_eq!(
            values("two thousand five hundred twenty-one", false),
            vec![2521.0]
        );
        assert_eq!(values("twenty-five 4", false), vec![25.0, 4.0]);
    }

    #[test]
    fn test_number_words_that_do_not_combine_stay_apart() {
        assert_eq!(values("five and three", false), vec![5.0, 3.0]);
        assert_eq!(values("five three", false), vec![5.0, 3.0]);
        assert_eq!(values("twenty thirty", false), vec![20.0, 30.0]);
        assert_eq!(values("twelve 4", false), vec![12.0, 4.0]);
    }

    #[test]
    fn test_span_records_token_range() {
        let spans = number_spans(&tokens("convert twenty five miles kilometers"));
        assert_eq!(
            spans,
            vec![NumberSpan {
                value: 25.0,
                start: 1,
                end: 2,
            }]
        );
    }

    #[test]
    fn test_anchor_moves_initial_amount_first() {
        let raw = tokens("she spent 3 dollars she had 10 dollars originally");
        let mut numbers = vec![3.0, 10.0];
        assert_eq!(anchor_initial_quantity(&raw, &mut numbers), Some(10.0));
        assert_eq!(numbers, vec![10.0, 3.0]);
    }

    #[test]
    fn test_anchor_ignores_out_of() {
        let raw = tokens("5 out of 10");
        let mut numbers = vec![5.0, 10.0];
        assert_eq!(anchor_initial_quantity(&raw, &mut numbers), None);
        assert_eq!(numbers, vec![5.0, 10.0]);
    }

    #[test]
    fn test_anchor_reads_number_words() {
        let raw = tokens("she spent 3 dollars after she had twenty five");
        let mut numbers = vec![3.0, 25.0];
        assert_eq!(anchor_initial_quantity(&raw, &mut numbers), Some(25.0));
        assert_eq!(numbers, vec![25.0, 3.0]);
    }

    #[test]
    fn test_anchor_of_only_looks_forward() {
        let raw = tokens("4 of 9");
        let mut numbers = vec![4.0, 9.0];
        assert_eq!(anchor_initial_quantity(&raw, &mut numbers), Some(9.0));
        assert_eq!(numbers, vec![9.0, 4.0]);
    }
}
