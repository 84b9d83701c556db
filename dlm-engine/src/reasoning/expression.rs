//! Flat arithmetic expressions: numbers joined by binary operators,
//! evaluated with the usual precedence.

use thiserror::Error;

use super::lexicon::Operator;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("expected {expected} operators, got {got}")]
    Arity { expected: usize, got: usize },
    #[error("'{0}' is not an arithmetic operator")]
    NotArithmetic(Operator),
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not a finite number")]
    NonFinite,
}

/// Evaluate `n0 op0 n1 op1 ... n_k`, multiplication and division first.
pub fn evaluate(numbers: &[f64], ops: &[Operator]) -> Result<f64, ExpressionError> {
    if numbers.is_empty() || ops.len() + 1 != numbers.len() {
        return Err(ExpressionError::Arity {
            expected: numbers.len().saturating_sub(1),
            got: ops.len(),
        });
    }

    // Fold * and / into terms, keep + and - for the second pass
    let mut terms = vec![numbers[0]];
    let mut additive = Vec::new();
    for (op, &rhs) in ops.iter().zip(&numbers[1..]) {
        match op {
            Operator::Multiply | Operator::Divide => {
                if let Some(last) = terms.last_mut() {
                    *last = apply(*op, *last, rhs)?;
                }
            }
            Operator::Add | Operator::Subtract => {
                additive.push(*op);
                terms.push(rhs);
            }
            Operator::Convert => return Err(ExpressionError::NotArithmetic(*op)),
        }
    }

    let mut result = terms[0];
    for (op, &term) in additive.iter().zip(&terms[1..]) {
        result = apply(*op, result, term)?;
    }

    if result.is_finite() {
        Ok(result)
    } else {
        Err(ExpressionError::NonFinite)
    }
}

fn apply(op: Operator, lhs: f64, rhs: f64) -> Result<f64, ExpressionError> {
    Ok(match op {
        Operator::Add => lhs + rhs,
        Operator::Subtract => lhs - rhs,
        Operator::Multiply => lhs * rhs,
        Operator::Divide => {
            if rhs == 0.0 {
                return Err(ExpressionError::DivisionByZero);
            }
            lhs / rhs
        }
        Operator::Convert => return Err(ExpressionError::NotArithmetic(op)),
    })
}

/// Human-readable expression, e.g. `4 + 5 * 2`.
pub fn render(numbers: &[f64], ops: &[Operator]) -> String {
    let mut out = String::new();
    for (idx, number) in numbers.iter().enumerate() {
        if idx > 0 {
            let op = ops.get(idx - 1).map_or("?", |op| op.symbol());
            out.push(' ');
            out.push_str(op);
            out.push(' ');
        }
        out.push_str(&format_number(*number));
    }
    out
}

/// Integers without a trailing `.0`, everything else rounded to six places.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let rounded = format!("{value:.6}");
    rounded
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
