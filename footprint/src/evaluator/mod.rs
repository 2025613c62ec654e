//! Dotted-name formula evaluation
//!
//! Recomputes one metric from the rule registry and a participant's
//! situation:
//! 1. Look up the rule and dispatch on its formula shape
//! 2. Resolve referenced names from the situation, or from their defaults
//! 3. Evaluate conditions, merging relative references into the rule's
//!    namespace
//!
//! Public entry points never fail. Internal failures are logged and the
//! metric falls back to `0` (or `false` for conditions) so that one broken
//! rule does not abort a whole statistics pass.

pub mod condition;
pub mod context;
pub mod operations;
pub mod rules;
pub mod values;

use crate::{FootprintError, ResourceLimits, RuleRegistry, Situation};
use context::EvaluationContext;
use tracing::error;

/// Evaluates dotted-names against situations
///
/// Holds no state besides its limits: one instance can serve any number of
/// threads, registries and situations.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    limits: ResourceLimits,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator with custom resource limits
    pub fn with_limits(limits: ResourceLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Value of the rule at `name` for this situation
    pub fn evaluate(&self, name: &str, situation: &Situation, rules: &RuleRegistry) -> f64 {
        let mut context = EvaluationContext::new(rules, situation, &self.limits);
        match rules::evaluate_rule(name, &mut context) {
            Ok(value) => value,
            Err(e) => {
                report_failure(name, situation, &e);
                0.0
            }
        }
    }

    /// Whether `expr` holds for this situation
    pub fn evaluate_condition(
        &self,
        expr: &str,
        situation: &Situation,
        rules: &RuleRegistry,
    ) -> bool {
        let mut context = EvaluationContext::new(rules, situation, &self.limits);
        match condition::evaluate_condition(expr, &mut context) {
            Ok(matched) => matched,
            Err(e) => {
                report_failure(expr, situation, &e);
                false
            }
        }
    }

    /// Numeric value of `reference`, from the situation or its default
    pub fn resolve_value(
        &self,
        reference: &str,
        situation: &Situation,
        rules: &RuleRegistry,
    ) -> f64 {
        let mut context = EvaluationContext::new(rules, situation, &self.limits);
        match values::resolve_value(reference, &mut context) {
            Ok(value) => value,
            Err(e) => {
                report_failure(reference, situation, &e);
                0.0
            }
        }
    }

    /// Default value of `name`, ignoring any answer in the situation
    pub fn resolve_default(
        &self,
        name: &str,
        situation: &Situation,
        rules: &RuleRegistry,
    ) -> f64 {
        let mut context = EvaluationContext::new(rules, situation, &self.limits);
        match values::resolve_default(name, &mut context) {
            Ok(value) => value,
            Err(e) => {
                report_failure(name, situation, &e);
                0.0
            }
        }
    }
}

fn report_failure(name: &str, situation: &Situation, e: &FootprintError) {
    let situation = serde_json::to_string(situation).unwrap_or_default();
    error!(dotted_name = name, situation = %situation, error = %e, "evaluation failed");
}

/// [`Evaluator::evaluate`] with default limits
pub fn evaluate(name: &str, situation: &Situation, rules: &RuleRegistry) -> f64 {
    Evaluator::new().evaluate(name, situation, rules)
}

/// [`Evaluator::evaluate_condition`] with default limits
pub fn evaluate_condition(expr: &str, situation: &Situation, rules: &RuleRegistry) -> bool {
    Evaluator::new().evaluate_condition(expr, situation, rules)
}

/// [`Evaluator::resolve_value`] with default limits
pub fn resolve_value(reference: &str, situation: &Situation, rules: &RuleRegistry) -> f64 {
    Evaluator::new().resolve_value(reference, situation, rules)
}

/// [`Evaluator::resolve_default`] with default limits
pub fn resolve_default(name: &str, situation: &Situation, rules: &RuleRegistry) -> f64 {
    Evaluator::new().resolve_default(name, situation, rules)
}
