//! Condition expressions
//!
//! A condition is either a bare reference, true when the participant answered
//! `oui`, or a comparison `<reference> <op> <literal>`. Anything that does not
//! parse evaluates to false.

use super::context::EvaluationContext;
use super::operations::{comparison_operation, ComparisonOperator, Operand};
use super::values::resolve_value;
use crate::{FootprintResult, SituationValue};
use regex::Regex;
use std::sync::LazyLock;

/// Answer that makes a bare reference true
pub const TRUE_ANSWER: &str = "oui";

static OPERATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([<>=])\s*").expect("operator pattern is valid"));

/// A condition split into its parts
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCondition<'a> {
    pub reference: &'a str,
    pub comparison: Option<(ComparisonOperator, Operand<'a>)>,
}

/// Split a condition at its first operator
///
/// The literal stops at the next operator, if any. Returns `None` when the
/// reference or the literal is empty.
pub fn parse_condition(expr: &str) -> Option<ParsedCondition<'_>> {
    let expr = expr.trim();

    let Some(captures) = OPERATOR.captures(expr) else {
        return (!expr.is_empty()).then_some(ParsedCondition {
            reference: expr,
            comparison: None,
        });
    };

    let (whole, token) = (captures.get(0)?, captures.get(1)?);
    let reference = expr[..whole.start()].trim();
    let rest = &expr[whole.end()..];
    let literal = match OPERATOR.find(rest) {
        Some(next) => &rest[..next.start()],
        None => rest,
    }
    .trim();

    if reference.is_empty() || literal.is_empty() {
        return None;
    }

    let op = ComparisonOperator::from_token(token.as_str())?;
    let literal = match literal.parse::<f64>() {
        Ok(n) if n.is_finite() => Operand::Number(n),
        _ => Operand::Text(literal),
    };

    Some(ParsedCondition {
        reference,
        comparison: Some((op, literal)),
    })
}

/// Evaluate a condition against the context's situation
pub fn evaluate_condition(expr: &str, context: &mut EvaluationContext) -> FootprintResult<bool> {
    let Some(parsed) = parse_condition(expr) else {
        return Ok(false);
    };

    let situation = context.situation;
    let answer = situation.get(parsed.reference);

    let Some((op, literal)) = parsed.comparison else {
        return Ok(matches!(answer, Some(SituationValue::Text(text)) if text == TRUE_ANSWER));
    };

    let matched = match answer {
        Some(SituationValue::Text(text)) => {
            comparison_operation(&Operand::Text(text.as_str()), op, &literal)
        }
        _ => {
            let left = resolve_value(parsed.reference, context)?;
            comparison_operation(&Operand::Number(left), op, &literal)
        }
    };
    Ok(matched)
}
