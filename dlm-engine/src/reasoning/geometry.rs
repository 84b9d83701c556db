//! Area and volume formulas for common shapes, and the fuzzy routing that
//! decides whether a compute query is a geometry problem.

use std::f64::consts::PI;
use std::fmt;

use crate::similarity::edit_similarity;

use super::numbers::number_spans;

/// Cutoff for recognising a shape name ("rectangular" ~ "rectangle").
pub const SHAPE_CUTOFF: f64 = 0.80;
/// Cutoff for the "area" / "volume" / "height" keywords.
pub const KEYWORD_CUTOFF: f64 = 0.70;

/// Adjectival endings people tack onto shapes ("squarish", "circular").
const SHAPE_SUFFIXES: &[&str] = &["ular", "ish", "al"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Area,
    Volume,
}

impl Measure {
    pub const ALL: [Measure; 2] = [Measure::Area, Measure::Volume];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Volume => "volume",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Shape {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub measure: Measure,
    /// Parameter names, in the order `formula` expects them.
    pub params: &'static [&'static str],
    formula: fn(&[f64]) -> f64,
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("name", &self.name)
            .field("measure", &self.measure)
            .field("params", &self.params)
            .finish()
    }
}

impl Shape {
    pub fn needs_height(&self) -> bool {
        self.params.contains(&"height")
    }

    /// Apply the formula; `None` unless exactly one value per parameter.
    pub fn evaluate(&self, values: &[f64]) -> Option<f64> {
        if values.len() != self.params.len() {
            return None;
        }
        let result = (self.formula)(values);
        result.is_finite().then_some(result)
    }

    fn spellings(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

pub static SHAPES: &[Shape] = &[
    Shape {
        name: "triangle",
        aliases: &[],
        measure: Measure::Area,
        params: &["base", "height"],
        formula: |v| 0.5 * v[0] * v[1],
    },
    Shape {
        name: "rectangle",
        aliases: &[],
        measure: Measure::Area,
        params: &["length", "width"],
        formula: |v| v[0] * v[1],
    },
    Shape {
        name: "parallelogram",
        aliases: &[],
        measure: Measure::Area,
        params: &["base", "height"],
        formula: |v| v[0] * v[1],
    },
    Shape {
        name: "square",
        aliases: &[],
        measure: Measure::Area,
        params: &["side"],
        formula: |v| v[0].powi(2),
    },
    Shape {
        name: "trapezoid",
        aliases: &["trapezium"],
        measure: Measure::Area,
        params: &["base_a", "base_b", "height"],
        formula: |v| 0.5 * (v[0] + v[1]) * v[2],
    },
    Shape {
        name: "circle",
        aliases: &[],
        measure: Measure::Area,
        params: &["radius"],
        formula: |v| PI * v[0].powi(2),
    },
    Shape {
        name: "ellipse",
        aliases: &["oval"],
        measure: Measure::Area,
        params: &["semi_axis_a", "semi_axis_b"],
        formula: |v| PI * v[0] * v[1],
    },
    Shape {
        name: "pentagon",
        aliases: &[],
        measure: Measure::Area,
        params: &["side"],
        formula: |v| 0.25 * (5.0 * (5.0 + 2.0 * 5f64.sqrt())).sqrt() * v[0].powi(2),
    },
    Shape {
        name: "cube",
        aliases: &[],
        measure: Measure::Volume,
        params: &["side"],
        formula: |v| v[0].powi(3),
    },
    Shape {
        name: "rectangular prism",
        aliases: &["box", "cuboid"],
        measure: Measure::Volume,
        params: &["length", "width", "height"],
        formula: |v| v[0] * v[1] * v[2],
    },
    Shape {
        name: "cylinder",
        aliases: &[],
        measure: Measure::Volume,
        params: &["radius", "height"],
        formula: |v| PI * v[0].powi(2) * v[1],
    },
    Shape {
        name: "cone",
        aliases: &[],
        measure: Measure::Volume,
        params: &["radius", "height"],
        formula: |v| PI * v[0].powi(2) * v[1] / 3.0,
    },
    Shape {
        name: "sphere",
        aliases: &["ball"],
        measure: Measure::Volume,
        params: &["radius"],
        formula: |v| 4.0 / 3.0 * PI * v[0].powi(3),
    },
    Shape {
        name: "pyramid",
        aliases: &[],
        measure: Measure::Volume,
        params: &["base_area", "height"],
        formula: |v| v[0] * v[1] / 3.0,
    },
];

fn strip_shape_suffix(word: &str) -> Option<&str> {
    SHAPE_SUFFIXES
        .iter()
        .find(|suffix| word.len() > suffix.len() + 2 && word.ends_with(*suffix))
        .map(|suffix| &word[..word.len() - suffix.len()])
}

fn word_score(word: &str, spelling_word: &str) -> f64 {
    let direct = edit_similarity(word, spelling_word);
    strip_shape_suffix(word).map_or(direct, |s| direct.max(edit_similarity(s, spelling_word)))
}

/// Word-by-word score of `words` against a spelling with the same word count;
/// the weakest word decides.
fn phrase_score(words: &[String], spelling: &str) -> Option<f64> {
    let parts: Vec<&str> = spelling.split(' ').collect();
    if parts.len() != words.len() {
        return None;
    }
    words
        .iter()
        .zip(parts)
        .map(|(word, part)| word_score(word, part))
        .reduce(f64::min)
}

fn best_shape(words: &[String]) -> Option<&'static Shape> {
    let mut best: Option<(&'static Shape, f64)> = None;
    for shape in SHAPES {
        for spelling in shape.spellings() {
            let Some(score) = phrase_score(words, spelling) else {
                continue;
            };
            if score >= SHAPE_CUTOFF && best.is_none_or(|(_, top)| score > top) {
                best = Some((shape, score));
            }
        }
    }
    best.map(|(shape, _)| shape)
}

/// Shape named in the query. Two-word names are tried on bigrams first; a
/// "prism" that did not match stops single-word matching so
/// "triangular prism" is not read as a triangle.
pub fn detect_shape(tokens: &[String]) -> Option<&'static Shape> {
    if let Some(shape) = tokens.windows(2).find_map(best_shape) {
        return Some(shape);
    }
    if tokens.iter().any(|t| t == "prism") {
        return None;
    }
    tokens.chunks(1).find_map(best_shape)
}

/// Whether the query asks for an area or a volume.
pub fn detect_measure(tokens: &[String]) -> Option<Measure> {
    tokens.iter().find_map(|token| {
        Measure::ALL
            .into_iter()
            .find(|measure| edit_similarity(token, measure.as_str()) >= KEYWORD_CUTOFF)
    })
}

fn is_height_word(token: &str) -> bool {
    edit_similarity(token, "height") >= KEYWORD_CUTOFF
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    MissingValue { param: &'static str },
    Undefined,
}

/// Outcome of fitting a query's numbers to a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub height: Option<f64>,
    /// Numbers other than the height, in query order.
    pub other_values: Vec<f64>,
    pub result: Result<f64, GeometryError>,
}

/// Pull the shape's parameters out of the tokens and evaluate.
///
/// The height is the number right after a "height" word, else the one right
/// before it. Every other number fills the remaining parameters in order;
/// extra numbers are ignored.
pub fn measure(shape: &Shape, tokens: &[String]) -> Measurement {
    let spans = number_spans(tokens);
    let mut height = None;
    if shape.needs_height() {
        for (idx, token) in tokens.iter().enumerate() {
            if !is_height_word(token) {
                continue;
            }
            let after = spans.iter().find(|s| s.start == idx + 1);
            let before = spans.iter().find(|s| s.end + 1 == idx);
            if let Some(found) = after.or(before) {
                height = Some((found.start, found.value));
                break;
            }
        }
    }

    let other_values: Vec<f64> = spans
        .iter()
        .filter(|s| height.is_none_or(|(h, _)| h != s.start))
        .map(|s| s.value)
        .collect();

    let mut pending = other_values.iter().copied();
    let mut values = Vec::with_capacity(shape.params.len());
    let mut missing = None;
    for param in shape.params {
        let value = if *param == "height" {
            height.map(|(_, v)| v)
        } else {
            pending.next()
        };
        match value {
            Some(v) => values.push(v),
            None => {
                missing = Some(*param);
                break;
            }
        }
    }

    let result = match missing {
        Some(param) => Err(GeometryError::MissingValue { param }),
        None => shape
            .evaluate(&values)
            .map(round4)
            .ok_or(GeometryError::Undefined),
    };

    Measurement {
        height: height.map(|(_, v)| v),
        other_values,
        result,
    }
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn shape(name: &str) -> &'static Shape {
        SHAPES.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn test_formulas() {
        let cases: &[(&str, &[f64], f64)] = &[
            ("triangle", &[4.0, 5.0], 10.0),
            ("rectangle", &[3.0, 4.0], 12.0),
            ("parallelogram", &[3.0, 4.0], 12.0),
            ("square", &[3.0], 9.0),
            ("trapezoid", &[3.0, 5.0, 2.0], 8.0),
            ("circle", &[1.0], 3.1416),
            ("ellipse", &[2.0, 3.0], 18.8496),
            ("pentagon", &[2.0], 6.8819),
            ("cube", &[3.0], 27.0),
            ("rectangular prism", &[2.0, 3.0, 4.0], 24.0),
            ("cylinder", &[1.0, 2.0], 6.2832),
            ("cone", &[3.0, 3.0], 28.2743),
            ("sphere", &[3.0], 113.0973),
            ("pyramid", &[9.0, 4.0], 12.0),
        ];
        for (name, values, expected) in cases {
            let got = round4(shape(name).evaluate(values).unwrap());
            assert!((got - expected).abs() < 1e-9, "{name}: {got}");
        }
    }

    #[test]
    fn test_evaluate_rejects_wrong_arity() {
        assert_eq!(shape("triangle").evaluate(&[4.0]), None);
        assert_eq!(shape("square").evaluate(&[4.0, 5.0]), None);
    }

    #[test]
    fn test_detect_shape_with_suffixes() {
        assert_eq!(detect_shape(&tokens("area squarish 4")).unwrap().name, "square");
        assert_eq!(detect_shape(&tokens("area circular pond")).unwrap().name, "circle");
        assert_eq!(
            detect_shape(&tokens("volume of rectangular prism 2 3 4")).unwrap().name,
            "rectangular prism"
        );
        assert_eq!(detect_shape(&tokens("volume box 2 3 4")).unwrap().name, "rectangular prism");
    }

    #[test]
    fn test_unmatched_prism_blocks_single_words() {
        assert!(detect_shape(&tokens("volume triangular prism 3")).is_none());
        assert!(detect_shape(&tokens("what 4 plus 5")).is_none());
    }

    #[test]
    fn test_detect_measure() {
        assert_eq!(detect_measure(&tokens("area of a triangle")), Some(Measure::Area));
        assert_eq!(detect_measure(&tokens("volumes cube")), Some(Measure::Volume));
        assert_eq!(detect_measure(&tokens("what 4 plus 5")), None);
    }

    #[test]
    fn test_triangle_with_height_after_keyword() {
        let toks = tokens("area of a triangle base 4 height 5");
        let m = measure(shape("triangle"), &toks);
        assert_eq!(m.height, Some(5.0));
        assert_eq!(m.other_values, vec![4.0]);
        assert_eq!(m.result, Ok(10.0));
    }

    #[test]
    fn test_height_before_keyword() {
        let toks = tokens("cylinder radius 2 and 10 height");
        let m = measure(shape("cylinder"), &toks);
        assert_eq!(m.height, Some(10.0));
        assert_eq!(m.result, Ok(round4(PI * 4.0 * 10.0)));
    }

    #[test]
    fn test_missing_height_fails_gracefully() {
        let m = measure(shape("cone"), &tokens("volume cone radius 3"));
        assert_eq!(m.height, None);
        assert_eq!(m.result, Err(GeometryError::MissingValue { param: "height" }));
    }

    #[test]
    fn test_word_numbers_fill_params() {
        let m = measure(shape("square"), &tokens("area square side three"));
        assert_eq!(m.result, Ok(9.0));

        let m = measure(shape("triangle"), &tokens("area triangle base twenty five height 2"));
        assert_eq!(m.other_values, vec![25.0]);
        assert_eq!(m.result, Ok(25.0));
    }
}
