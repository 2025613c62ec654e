//! Numeric values of dotted-names
//!
//! A name's value comes from the situation when the participant answered it,
//! and from the rule's default otherwise.

use super::condition::evaluate_condition;
use super::context::{EvaluationContext, FrameKind};
use super::rules::evaluate_rule;
use crate::namespace::{is_valid_dotted_name, merge};
use crate::{DefaultValue, FootprintResult, RegistryEntry};

/// Value of `reference`: the situation's answer, else the rule's default
pub fn resolve_value(reference: &str, context: &mut EvaluationContext) -> FootprintResult<f64> {
    if !is_valid_dotted_name(reference) {
        return Ok(0.0);
    }

    match context.situation.get(reference).and_then(|value| value.as_number()) {
        Some(value) => Ok(value),
        None => resolve_default(reference, context),
    }
}

/// Value of an unanswered `name`
///
/// The `applicable if` guard is checked first and short-circuits to `0`. A
/// default that names another rule is merged into `name`'s namespace and
/// evaluated. Without a default, a rule's own formula is used, and a bare
/// numeric entry is its own value.
pub fn resolve_default(name: &str, context: &mut EvaluationContext) -> FootprintResult<f64> {
    context.within(FrameKind::Default, name, 0.0, |context| {
        let rules = context.rules;
        let rule = match rules.get(name) {
            None => return Ok(0.0),
            Some(RegistryEntry::Bare(value)) => return Ok(value.unwrap_or(0.0)),
            Some(RegistryEntry::Rule(rule)) => rule,
        };

        if let Some(applicable_if) = &rule.applicable_if {
            let applicable = match applicable_if.as_str() {
                Some(condition) => evaluate_condition(&merge(name, condition), context)?,
                None => false,
            };
            if !applicable {
                return Ok(0.0);
            }
        }

        match &rule.default_value {
            Some(DefaultValue::Number(value)) => Ok(*value),
            Some(DefaultValue::Reference(reference)) => {
                evaluate_rule(&merge(name, reference), context)
            }
            // Computed rules are never answered; their formula is their value
            None if rule.formula.is_some() => evaluate_rule(name, context),
            None => Ok(0.0),
        }
    })
}
