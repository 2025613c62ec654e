//! The rule registry: every dotted-name of a model with its decoded definition
//!
//! A registry is loaded once per model version and shared read-only by every
//! evaluation, across threads if needed.

use crate::formula::{Condition, Formula};
use crate::{FootprintError, FootprintResult, ResourceLimits};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The `default` clause of a rule
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Number(f64),
    /// Dotted-name, possibly relative to the rule's namespace
    Reference(String),
}

/// A structured rule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleDefinition {
    pub applicable_if: Option<Condition>,
    pub default_value: Option<DefaultValue>,
    pub formula: Option<Formula>,
}

impl RuleDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formula(mut self, formula: impl Into<Formula>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    pub fn with_default(mut self, default_value: DefaultValue) -> Self {
        self.default_value = Some(default_value);
        self
    }

    pub fn with_applicable_if(mut self, condition: impl Into<Condition>) -> Self {
        self.applicable_if = Some(condition.into());
        self
    }
}

/// What a dotted-name maps to in the model
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEntry {
    Rule(RuleDefinition),
    /// Any non-object entry; only a bare number carries a value
    Bare(Option<f64>),
}

impl RegistryEntry {
    /// The rule's definition when the entry is structured
    pub fn as_rule(&self) -> Option<&RuleDefinition> {
        match self {
            RegistryEntry::Rule(rule) => Some(rule),
            RegistryEntry::Bare(_) => None,
        }
    }

    /// The value of a bare numeric formula, at top level or under `formula`
    pub fn constant(&self) -> Option<f64> {
        match self {
            RegistryEntry::Bare(value) => *value,
            RegistryEntry::Rule(rule) => match rule.formula {
                Some(Formula::Constant(value)) => Some(value),
                _ => None,
            },
        }
    }
}

impl From<RuleDefinition> for RegistryEntry {
    fn from(rule: RuleDefinition) -> Self {
        RegistryEntry::Rule(rule)
    }
}

/// Keys as they appear in the compiled model, with camelCase aliases
#[derive(Deserialize)]
struct RawRule {
    #[serde(rename = "applicable si", alias = "applicableIf")]
    applicable_if: Option<Value>,
    #[serde(rename = "par défaut", alias = "defaultValue")]
    default_value: Option<Value>,
    #[serde(rename = "formule", alias = "formula")]
    formula: Option<Value>,
}

impl From<RawRule> for RuleDefinition {
    fn from(raw: RawRule) -> Self {
        let default_value = raw.default_value.and_then(|value| match value {
            Value::Number(n) => n.as_f64().map(DefaultValue::Number),
            Value::String(s) => Some(DefaultValue::Reference(s)),
            _ => None,
        });

        RuleDefinition {
            applicable_if: raw.applicable_if.as_ref().map(Condition::from_json),
            default_value,
            formula: raw.formula.as_ref().map(Formula::from_json),
        }
    }
}

impl<'de> Deserialize<'de> for RegistryEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Object(_) => {
                let raw = RawRule::deserialize(value).map_err(serde::de::Error::custom)?;
                Ok(RegistryEntry::Rule(raw.into()))
            }
            Value::Number(n) => Ok(RegistryEntry::Bare(n.as_f64())),
            _ => Ok(RegistryEntry::Bare(None)),
        }
    }
}

/// Immutable mapping from dotted-name to rule
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RuleRegistry {
    rules: HashMap<String, RegistryEntry>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a compiled model: a JSON object keyed by dotted-name
    pub fn from_json_str(
        json: &str,
        source_id: &str,
        limits: &ResourceLimits,
    ) -> FootprintResult<Self> {
        if json.len() > limits.max_model_bytes {
            return Err(FootprintError::input_too_large(
                "max_model_bytes",
                limits.max_model_bytes,
                json.len(),
            ));
        }

        let registry: RuleRegistry = serde_json::from_str(json)
            .map_err(|e| FootprintError::registry(&e, source_id, Arc::from(json)))?;

        debug!(
            source = source_id,
            rules = registry.len(),
            "loaded rule registry"
        );
        Ok(registry)
    }

    pub fn with(mut self, name: impl Into<String>, entry: impl Into<RegistryEntry>) -> Self {
        self.insert(name, entry);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: impl Into<RegistryEntry>) {
        self.rules.insert(name.into(), entry.into());
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.rules.get(name)
    }

    /// The structured rule at `name`, ignoring bare entries
    pub fn rule(&self, name: &str) -> Option<&RuleDefinition> {
        self.rules.get(name).and_then(RegistryEntry::as_rule)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Dotted-names in lexicographic order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Number(n) => write!(f, "{}", n),
            DefaultValue::Reference(name) => write!(f, "{}", name),
        }
    }
}
