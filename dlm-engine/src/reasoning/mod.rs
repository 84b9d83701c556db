//! Compute mode: word problems, unit conversions and geometry.
//!
//! One pass per query. Mentions are collected for the narration, then the
//! query is routed to geometry when it names both a shape and a measure, and
//! otherwise to operator detection followed by either a unit conversion or an
//! arithmetic expression.

pub mod entities;
pub mod expression;
pub mod geometry;
pub mod lexicon;
pub mod numbers;
pub mod operators;
pub mod units;

use std::sync::Arc;

use tracing::debug;

use crate::context::TurnContext;
use crate::oracle::SimilarityOracle;

use entities::{PersonRecognizer, find_mentions};
use expression::{ExpressionError, format_number};
use geometry::{GeometryError, Measure};
use lexicon::{Operator, OperatorLexicon};
use numbers::NumberSpan;
use operators::OperatorDetector;
use units::{Unit, UnitTable};

const INSUFFICIENT: &str =
    "It looks like some essential details are missing, so I can't complete this calculation right now.";
const MALFORMED: &str =
    "Ah, something about that stumped me. I'll need to learn more to handle it properly.";

/// Terminal state of one compute query.
#[derive(Debug, Clone, PartialEq)]
pub enum ReasoningOutcome {
    Geometry {
        shape: &'static str,
        measure: Measure,
        value: f64,
    },
    GeometryFailed {
        shape: &'static str,
        measure: Measure,
        error: GeometryError,
    },
    Conversion {
        amount: f64,
        from: &'static Unit,
        to: &'static Unit,
        value: f64,
    },
    UnitsNotIdentified,
    IncompatibleUnits {
        from: &'static Unit,
        to: &'static Unit,
    },
    Arithmetic {
        expression: String,
        value: f64,
    },
    Malformed(ExpressionError),
    /// Not enough numbers or operators to work with.
    Insufficient { keywords: Vec<String> },
    /// Numbers and operators found, but they don't line up.
    Ambiguous { keywords: Vec<String> },
}

impl ReasoningOutcome {
    /// Numeric answer, if one was reached.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Geometry { value, .. }
            | Self::Conversion { value, .. }
            | Self::Arithmetic { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Geometry { value, .. } => format!("Geometric Answer: {}", format_number(*value)),
            Self::GeometryFailed { shape, measure, .. } => format!(
                "Unable to compute the {measure} of the {shape} due to missing or mismatched values."
            ),
            Self::Conversion {
                amount,
                from,
                to,
                value,
            } => format!(
                "Conversion Answer: {} {}(s) ==> {} {}(s)",
                format_number(*amount),
                from.name,
                format_number(*value),
                to.name
            ),
            Self::UnitsNotIdentified => {
                "Could not identify both source and target units.".to_string()
            }
            Self::IncompatibleUnits { from, to } => format!(
                "I can't convert {} ({}) into {} ({}).",
                from.name, from.quantity, to.name, to.quantity
            ),
            Self::Arithmetic { expression, value } => {
                format!("Arithmetic Answer: {expression} = {}", format_number(*value))
            }
            Self::Malformed(_) => MALFORMED.to_string(),
            Self::Insufficient { keywords } => {
                let mut out = INSUFFICIENT.to_string();
                if !keywords.is_empty() {
                    out.push_str(&format!(" I only found {}.", quoted(keywords)));
                }
                let measures: Vec<String> =
                    Measure::ALL.iter().map(|m| m.as_str().to_string()).collect();
                out.push_str(&format!(
                    " If you are asking a geometric query, try including {} in your query.",
                    quoted(&measures)
                ));
                out
            }
            Self::Ambiguous { keywords } => format!(
                "While trying to understand the math I ran into {}, which I use to connect words to operations. Try leaving one of those out or rephrasing it.",
                quoted(keywords)
            ),
        }
    }
}

fn quoted(words: &[String]) -> String {
    words
        .iter()
        .map(|w| format!("\"{w}\""))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn listed(numbers: &[f64]) -> String {
    numbers
        .iter()
        .map(|n| format_number(*n))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Outcome plus the narration of how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub outcome: ReasoningOutcome,
    /// Empty unless the turn asked for reasoning.
    pub trace: Vec<String>,
}

struct Narration {
    enabled: bool,
    lines: Vec<String>,
}

impl Narration {
    fn say(&mut self, line: impl FnOnce() -> String) {
        if self.enabled {
            self.lines.push(line());
        }
    }
}

pub struct Reasoner {
    lexicon: OperatorLexicon,
    units: UnitTable,
    recognizers: Vec<Box<dyn PersonRecognizer>>,
    oracle: Arc<dyn SimilarityOracle>,
}

impl Reasoner {
    pub fn new(
        units: UnitTable,
        recognizers: Vec<Box<dyn PersonRecognizer>>,
        oracle: Arc<dyn SimilarityOracle>,
    ) -> Self {
        Self {
            lexicon: OperatorLexicon::standard(&units),
            units,
            recognizers,
            oracle,
        }
    }

    pub fn lexicon(&self) -> &OperatorLexicon {
        &self.lexicon
    }

    pub async fn solve(&self, ctx: &TurnContext) -> Solution {
        let mut narration = Narration {
            enabled: ctx.display_reasoning,
            lines: Vec::new(),
        };
        let outcome = self.run(ctx, &mut narration).await;
        debug!("compute outcome: {:?}", outcome);
        Solution {
            outcome,
            trace: narration.lines,
        }
    }

    async fn run(&self, ctx: &TurnContext, narration: &mut Narration) -> ReasoningOutcome {
        let tokens = &ctx.query.tokens;
        narration.say(|| {
            "I am presented with a query asking me to do some form of computation.".to_string()
        });
        narration.say(|| {
            format!(
                "I've trimmed away any extra words so I'm focusing on \"{}\" now.",
                ctx.query.filtered()
            )
        });

        let recognizers: Vec<&dyn PersonRecognizer> =
            self.recognizers.iter().map(|r| r.as_ref()).collect();
        let mentions = find_mentions(&ctx.raw, &recognizers);
        narration.say(|| match mentions.persons.as_slice() {
            [] => "1.) I see no one mentioned as a person name; moving on.".to_string(),
            persons => format!(
                "1.) I see {} mentioned as a person name; they're likely key to this problem.",
                persons.join(", ")
            ),
        });
        narration.say(|| match mentions.items.as_slice() {
            [] => "2.) I see no items mentioned as proper nouns; moving on.".to_string(),
            items => format!(
                "2.) I see {} mentioned as proper nouns; this might be key to the problem.",
                items.join(", ")
            ),
        });

        let shape = geometry::detect_shape(tokens);
        if let Some(shape) = shape.filter(|_| geometry::detect_measure(tokens).is_some()) {
            debug!("routing to geometry: {}", shape.name);
            narration.say(|| {
                format!(
                    "3.) This is a geometric problem: the {} of a {}.",
                    shape.measure, shape.name
                )
            });
            let measurement = geometry::measure(shape, tokens);
            narration.say(|| match measurement.height {
                Some(h) => format!("The height of the {} is {}.", shape.name, format_number(h)),
                None => format!("The {} has no height given, so moving on.", shape.name),
            });
            narration.say(|| match measurement.other_values.as_slice() {
                [] => format!("No other dimensions of the {} were given.", shape.name),
                values => format!(
                    "The other dimensions of the {} are {}.",
                    shape.name,
                    listed(values)
                ),
            });
            return match measurement.result {
                Ok(value) => ReasoningOutcome::Geometry {
                    shape: shape.name,
                    measure: shape.measure,
                    value,
                },
                Err(error) => ReasoningOutcome::GeometryFailed {
                    shape: shape.name,
                    measure: shape.measure,
                    error,
                },
            };
        }

        let detection = OperatorDetector::new(&self.lexicon, &*self.oracle)
            .detect(tokens)
            .await;
        let conversion = detection.operators.contains(&Operator::Convert);
        let found = numbers::extract_numbers(tokens, conversion);
        let mut numbers: Vec<f64> = found.iter().map(|n| n.value).collect();

        let mut ops = detection.operators;
        if conversion && numbers.len() < 2 {
            ops = vec![Operator::Convert];
        } else {
            ops.retain(|op| *op != Operator::Convert);
        }

        let keywords = detection.keywords;
        let converting = ops == [Operator::Convert];
        if numbers.is_empty() || ops.is_empty() || (!converting && numbers.len() < 2) {
            return ReasoningOutcome::Insufficient { keywords };
        }

        if let Some(anchor) = numbers::anchor_initial_quantity(&ctx.raw_tokens(), &mut numbers) {
            narration.say(|| {
                format!(
                    "The starting amount looks like {}, so I begin from it.",
                    format_number(anchor)
                )
            });
        }
        narration.say(|| {
            format!(
                "3.) I've identified the numbers {} that I need to compute with.",
                listed(&numbers)
            )
        });
        narration.say(|| {
            let symbols: Vec<String> = ops.iter().map(|op| op.symbol().to_string()).collect();
            format!(
                "4.) I see the keywords {}, meaning I need to perform a {} operation.",
                quoted(&keywords),
                quoted(&symbols)
            )
        });

        if let ([amount], [_]) = (found.as_slice(), ops.as_slice()) {
            return self.convert(tokens, amount, narration);
        }

        if numbers.len() >= 2 && (ops.len() == numbers.len() - 1 || ops.len() == 1) {
            let average = tokens.iter().any(|t| t == "average");
            // "average" adds everything; a lone operator joins every pair
            if average {
                ops = vec![Operator::Add; numbers.len() - 1];
            } else if ops.len() == 1 {
                ops = vec![ops[0]; numbers.len() - 1];
            }
            narration.say(|| {
                "Now I have the parts, so let me put it all together and solve.".to_string()
            });

            let mut expression = expression::render(&numbers, &ops);
            return match expression::evaluate(&numbers, &ops) {
                Ok(mut value) => {
                    if average {
                        value /= numbers.len() as f64;
                        expression = format!("({expression}) / {}", numbers.len());
                    }
                    ReasoningOutcome::Arithmetic { expression, value }
                }
                Err(err) => ReasoningOutcome::Malformed(err),
            };
        }

        ReasoningOutcome::Ambiguous { keywords }
    }

    /// Source unit is the first unit after the number, target the first other
    /// unit anywhere in the query.
    fn convert(
        &self,
        tokens: &[String],
        number: &NumberSpan,
        narration: &mut Narration,
    ) -> ReasoningOutcome {
        let amount = number.value;
        let Some(from) = tokens[number.end + 1..].iter().find_map(|t| self.units.find(t)) else {
            return ReasoningOutcome::UnitsNotIdentified;
        };
        let Some(to) = tokens
            .iter()
            .filter_map(|t| self.units.find(t))
            .find(|u| u.name != from.name)
        else {
            return ReasoningOutcome::UnitsNotIdentified;
        };

        match units::convert(amount, from, to) {
            Ok(value) => {
                narration.say(|| {
                    format!(
                        "I need to take {} and multiply it by {}. Finally, I divide by {} and I got my answer.",
                        format_number(amount),
                        from.scale,
                        to.scale
                    )
                });
                ReasoningOutcome::Conversion {
                    amount,
                    from,
                    to,
                    value,
                }
            }
            Err(units::IncompatibleUnits { from, to }) => {
                ReasoningOutcome::IncompatibleUnits { from, to }
            }
        }
    }
}
