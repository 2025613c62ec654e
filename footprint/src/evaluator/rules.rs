//! Rule and formula evaluation
//!
//! Looks up a rule and dispatches over the formula shapes it may carry.

use super::condition::evaluate_condition;
use super::context::{EvaluationContext, FrameKind};
use super::operations::coerce_number;
use super::values::resolve_value;
use crate::formula::{Branch, Condition, Formula, FormulaExpression};
use crate::namespace::merge;
use crate::FootprintResult;

/// Evaluate the rule at `name`
///
/// Missing rules and rules without a formula are `0`. A bare entry is its
/// own value.
pub fn evaluate_rule(name: &str, context: &mut EvaluationContext) -> FootprintResult<f64> {
    context.within(FrameKind::Formula, name, 0.0, |context| {
        let rules = context.rules;
        let Some(entry) = rules.get(name) else {
            return Ok(0.0);
        };
        if let Some(value) = entry.constant() {
            return Ok(value);
        }

        match entry.as_rule().and_then(|rule| rule.formula.as_ref()) {
            Some(Formula::Expression(expression)) => evaluate_formula(name, expression, context),
            _ => Ok(0.0),
        }
    })
}

/// Evaluate `expression`, a formula of the rule at `name`
pub fn evaluate_formula(
    name: &str,
    expression: &FormulaExpression,
    context: &mut EvaluationContext,
) -> FootprintResult<f64> {
    match expression {
        FormulaExpression::Variations { clauses, otherwise } => {
            for clause in clauses {
                if matches_in_namespace(name, &clause.condition, context)? {
                    return match &clause.then {
                        Branch::Formula(nested) => evaluate_formula(name, nested, context),
                        Branch::Number(value) if value.is_nan() => Ok(0.0),
                        Branch::Number(value) => Ok(*value),
                        Branch::Text(text) => Ok(coerce_number(text).unwrap_or(0.0)),
                    };
                }
            }
            // A bare fallback yields 0, not its own value
            match otherwise {
                Some(Branch::Formula(nested)) => evaluate_formula(name, nested, context),
                _ => Ok(0.0),
            }
        }

        // Only the first reference is resolved
        FormulaExpression::Average(references) => match references.first() {
            Some(reference) => resolve_value(reference, context),
            None => Ok(0.0),
        },

        FormulaExpression::Sum(references) => {
            let mut total = 0.0;
            for reference in references {
                total += resolve_value(reference, context)?;
            }
            Ok(total)
        }

        FormulaExpression::AnyOf(conditions) => {
            for condition in conditions {
                if matches(condition, context)? {
                    return Ok(1.0);
                }
            }
            Ok(0.0)
        }

        FormulaExpression::AllOf(conditions) => {
            for condition in conditions {
                if !matches(condition, context)? {
                    return Ok(0.0);
                }
            }
            Ok(1.0)
        }

        FormulaExpression::Unsupported => Ok(0.0),
    }
}

fn matches(condition: &Condition, context: &mut EvaluationContext) -> FootprintResult<bool> {
    match condition.as_str() {
        Some(expr) => evaluate_condition(expr, context),
        None => Ok(false),
    }
}

fn matches_in_namespace(
    name: &str,
    condition: &Condition,
    context: &mut EvaluationContext,
) -> FootprintResult<bool> {
    match condition.as_str() {
        Some(expr) => evaluate_condition(&merge(name, expr), context),
        None => Ok(false),
    }
}
