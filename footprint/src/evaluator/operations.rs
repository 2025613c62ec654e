//! Comparison operators of condition expressions
//!
//! Only numbers compare with `<` and `>`; text only supports `=`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    LessThan,
    GreaterThan,
    Equal,
}

impl ComparisonOperator {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" => Some(ComparisonOperator::LessThan),
            ">" => Some(ComparisonOperator::GreaterThan),
            "=" => Some(ComparisonOperator::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::Equal => "=",
        };
        write!(f, "{}", token)
    }
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Operand<'a> {
    Number(f64),
    Text(&'a str),
}

/// Compare two operands; mismatched kinds never match
pub fn comparison_operation(left: &Operand, op: ComparisonOperator, right: &Operand) -> bool {
    match (left, right) {
        (Operand::Number(l), Operand::Number(r)) => match op {
            ComparisonOperator::LessThan => l < r,
            ComparisonOperator::GreaterThan => l > r,
            ComparisonOperator::Equal => l == r,
        },
        (Operand::Text(l), Operand::Text(r)) => op == ComparisonOperator::Equal && l == r,
        _ => false,
    }
}

/// Numeric coercion of raw text: trimmed, blank is `0`, non-numbers are `None`
pub fn coerce_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
