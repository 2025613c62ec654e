//! # Footprint Engine
//!
//! **Carbon footprint metrics without the full rules engine**
//!
//! Recomputes single metrics of a declarative carbon footprint model from a
//! participant's answers. Only the subset of the rule language needed for
//! published poll statistics is supported, which makes evaluating thousands of
//! stored situations cheap.
//!
//! ## Quick Start
//!
//! ```rust
//! use footprint::{evaluate, FootprintResult, ResourceLimits, RuleRegistry, Situation};
//!
//! fn main() -> FootprintResult<()> {
//!     let limits = ResourceLimits::default();
//!     let rules = RuleRegistry::from_json_str(
//!         r#"{
//!             "transport": { "formule": { "somme": ["transport . voiture", "transport . avion"] } },
//!             "transport . voiture": { "formule": 1200 },
//!             "transport . avion": { "par défaut": 350 }
//!         }"#,
//!         "model.json",
//!         &limits,
//!     )?;
//!
//!     let situation = Situation::new();
//!     assert_eq!(evaluate("transport", &situation, &rules), 1550.0);
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Dotted-names
//! Every rule is identified by segments joined with `" . "`. References inside
//! conditions and defaults may be relative to the enclosing rule.
//!
//! ### Situations
//! A participant's answers keyed by dotted-name. Unanswered questions fall
//! back to the rule's default, guarded by its `applicable si` condition.
//!
//! ### Formulas
//! Five shapes are evaluated: `variations`, `moyenne`, `somme`,
//! `une de ces conditions` and `toutes ces conditions`. Anything else is `0`.

pub mod error;
pub mod evaluator;
pub mod formula;
pub mod funfacts;
pub mod namespace;
pub mod registry;
pub mod resource_limits;
pub mod situation;

pub use error::{ErrorDetails, FootprintError, Span};
pub use evaluator::{evaluate, evaluate_condition, resolve_default, resolve_value, Evaluator};
pub use formula::{Branch, Condition, Formula, FormulaExpression, VariationClause};
pub use funfacts::{compute_fun_facts, Aggregation, FunFactDefinition, FunFacts, FunFactsCatalogue};
pub use namespace::{merge, SEPARATOR};
pub use registry::{DefaultValue, RegistryEntry, RuleDefinition, RuleRegistry};
pub use resource_limits::ResourceLimits;
pub use situation::{Situation, SituationValue};

/// Result type for Footprint operations
pub type FootprintResult<T> = Result<T, FootprintError>;

#[cfg(test)]
mod tests;
