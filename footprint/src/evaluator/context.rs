//! Evaluation context for resolving one dotted-name
//!
//! Holds the read-only inputs plus the stack of names currently being
//! resolved, which guards against cycles in the rule graph.

use crate::{FootprintError, FootprintResult, ResourceLimits, RuleRegistry, Situation};
use tracing::warn;

/// What a frame on the resolution stack is computing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// The rule's formula
    Formula,
    /// The rule's default value for an unanswered question
    Default,
}

/// Context for a single evaluation call
///
/// Contains everything needed while resolving:
/// - Rules (the model, shared)
/// - Situation (the participant's answers, shared)
/// - Stack (names being resolved, owned by this call)
pub struct EvaluationContext<'a> {
    pub rules: &'a RuleRegistry,
    pub situation: &'a Situation,
    limits: &'a ResourceLimits,
    stack: Vec<(FrameKind, String)>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        rules: &'a RuleRegistry,
        situation: &'a Situation,
        limits: &'a ResourceLimits,
    ) -> Self {
        Self {
            rules,
            situation,
            limits,
            stack: Vec::new(),
        }
    }

    /// Number of frames currently on the stack
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Number of formula frames on the stack, the rule nesting level
    ///
    /// Default frames sit between formula frames and do not add a level.
    pub fn nesting(&self) -> usize {
        self.stack
            .iter()
            .filter(|(kind, _)| *kind == FrameKind::Formula)
            .count()
    }

    /// Run `resolve` with `(kind, name)` pushed on the stack
    ///
    /// Re-entering a frame that is already being resolved returns `on_cycle`
    /// without calling `resolve`. Nesting formulas deeper than the configured
    /// limit is an error.
    pub fn within<T>(
        &mut self,
        kind: FrameKind,
        name: &str,
        on_cycle: T,
        resolve: impl FnOnce(&mut Self) -> FootprintResult<T>,
    ) -> FootprintResult<T> {
        if self
            .stack
            .iter()
            .any(|(frame_kind, frame_name)| *frame_kind == kind && frame_name == name)
        {
            let error = FootprintError::CircularReference(self.describe_cycle(name));
            warn!(dotted_name = name, error = %error, "reference cycle, using fallback");
            return Ok(on_cycle);
        }

        let nesting = self.nesting();
        if kind == FrameKind::Formula && nesting >= self.limits.max_resolution_depth {
            return Err(FootprintError::ResourceLimitExceeded {
                limit_name: "max_resolution_depth".to_string(),
                limit_value: self.limits.max_resolution_depth.to_string(),
                actual_value: (nesting + 1).to_string(),
                suggestion: format!(
                    "Resolving '{}' nests too deeply; flatten the model or raise the limit",
                    name
                ),
            });
        }

        self.stack.push((kind, name.to_string()));
        let result = resolve(self);
        self.stack.pop();
        result
    }

    fn describe_cycle(&self, name: &str) -> String {
        let start = self
            .stack
            .iter()
            .position(|(_, frame_name)| frame_name == name)
            .unwrap_or(0);
        let mut path: Vec<&str> = self.stack[start..]
            .iter()
            .map(|(_, frame_name)| frame_name.as_str())
            .collect();
        path.push(name);
        path.join(" -> ")
    }
}
