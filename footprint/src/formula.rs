//! Formula shapes understood by the evaluator
//!
//! Formulas are decoded once, when the registry is loaded. Shapes the
//! evaluator does not implement decode to [`FormulaExpression::Unsupported`]
//! instead of failing the whole model.

use serde_json::{Map, Value};
use std::fmt;

const VARIATIONS_KEY: &str = "variations";
const AVERAGE_KEYS: [&str; 2] = ["moyenne", "average"];
const SUM_KEYS: [&str; 2] = ["somme", "sum"];
const ANY_OF_KEYS: [&str; 2] = ["une de ces conditions", "anyOf"];
const ALL_OF_KEYS: [&str; 2] = ["toutes ces conditions", "allOf"];

const IF_KEYS: [&str; 2] = ["si", "if"];
const THEN_KEYS: [&str; 2] = ["alors", "then"];
const OTHERWISE_KEYS: [&str; 2] = ["sinon", "otherwise"];

/// The `formula` field of a rule
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    /// A bare numeric formula, e.g. `formule: 5`
    Constant(f64),
    Expression(FormulaExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpression {
    /// Ordered `si`/`alors` clauses with an optional trailing `sinon`
    Variations {
        clauses: Vec<VariationClause>,
        otherwise: Option<Branch>,
    },
    /// Only the first reference is ever resolved
    Average(Vec<String>),
    Sum(Vec<String>),
    AnyOf(Vec<Condition>),
    AllOf(Vec<Condition>),
    /// Any other formula (raw expressions, unknown mechanisms)
    Unsupported,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariationClause {
    pub condition: Condition,
    pub then: Branch,
}

/// Value produced by a variation clause
#[derive(Debug, Clone, PartialEq)]
pub enum Branch {
    Number(f64),
    /// Raw text, coerced to a number when selected
    Text(String),
    Formula(Box<FormulaExpression>),
}

/// A condition expression such as `transport . voiture . km > 1000`
///
/// `None` holds a clause that was not a string in the model; it never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition(Option<String>);

impl Condition {
    pub fn new(expr: impl Into<String>) -> Self {
        Self(Some(expr.into()))
    }

    pub fn malformed() -> Self {
        Self(None)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub(crate) fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::new(s.as_str()),
            _ => Self::malformed(),
        }
    }
}

impl From<&str> for Condition {
    fn from(expr: &str) -> Self {
        Self::new(expr)
    }
}

impl Formula {
    pub(crate) fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(n) => Formula::Constant(n),
                None => Formula::Expression(FormulaExpression::Unsupported),
            },
            other => Formula::Expression(FormulaExpression::from_json(other)),
        }
    }
}

impl From<f64> for Formula {
    fn from(value: f64) -> Self {
        Formula::Constant(value)
    }
}

impl From<FormulaExpression> for Formula {
    fn from(expression: FormulaExpression) -> Self {
        Formula::Expression(expression)
    }
}

impl FormulaExpression {
    pub(crate) fn from_json(value: &Value) -> Self {
        let Value::Object(object) = value else {
            return FormulaExpression::Unsupported;
        };

        if let Some(variations) = object.get(VARIATIONS_KEY) {
            return decode_variations(variations);
        }
        if let Some(references) = find(object, &AVERAGE_KEYS) {
            return FormulaExpression::Average(decode_references(references));
        }
        if let Some(references) = find(object, &SUM_KEYS) {
            return FormulaExpression::Sum(decode_references(references));
        }
        if let Some(conditions) = find(object, &ANY_OF_KEYS) {
            return FormulaExpression::AnyOf(decode_conditions(conditions));
        }
        if let Some(conditions) = find(object, &ALL_OF_KEYS) {
            return FormulaExpression::AllOf(decode_conditions(conditions));
        }
        FormulaExpression::Unsupported
    }

    /// Short name of the shape, as shown by tooling
    pub fn kind(&self) -> &'static str {
        match self {
            FormulaExpression::Variations { .. } => "variations",
            FormulaExpression::Average(_) => "average",
            FormulaExpression::Sum(_) => "sum",
            FormulaExpression::AnyOf(_) => "any of",
            FormulaExpression::AllOf(_) => "all of",
            FormulaExpression::Unsupported => "unsupported",
        }
    }
}

impl Branch {
    fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => Branch::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Branch::Text(s.clone()),
            Value::Null => Branch::Number(f64::NAN),
            other => Branch::Formula(Box::new(FormulaExpression::from_json(other))),
        }
    }
}

fn find<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

/// A single string is accepted where a list is expected
fn items(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    }
}

fn decode_references(value: &Value) -> Vec<String> {
    items(value)
        .iter()
        .map(|item| item.as_str().unwrap_or_default().to_string())
        .collect()
}

fn decode_conditions(value: &Value) -> Vec<Condition> {
    items(value).iter().map(Condition::from_json).collect()
}

fn decode_variations(value: &Value) -> FormulaExpression {
    let mut clauses = Vec::new();
    let mut otherwise = None;

    for item in items(value) {
        let Value::Object(clause) = item else {
            continue;
        };
        if let Some(condition) = find(clause, &IF_KEYS) {
            let then = find(clause, &THEN_KEYS)
                .map_or(Branch::Number(f64::NAN), Branch::from_json);
            clauses.push(VariationClause {
                condition: Condition::from_json(condition),
                then,
            });
        } else if let Some(fallback) = find(clause, &OTHERWISE_KEYS) {
            if otherwise.is_none() {
                otherwise = Some(Branch::from_json(fallback));
            }
        }
    }

    FormulaExpression::Variations { clauses, otherwise }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(expr) => write!(f, "{}", expr),
            None => write!(f, "<malformed>"),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Number(n) => write!(f, "{}", n),
            Branch::Text(s) => write!(f, "'{}'", s),
            Branch::Formula(formula) => write!(f, "({})", formula),
        }
    }
}

impl fmt::Display for FormulaExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaExpression::Variations { clauses, otherwise } => {
                write!(f, "variations [")?;
                for (index, clause) in clauses.iter().enumerate() {
                    if index > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "if {} then {}", clause.condition, clause.then)?;
                }
                if let Some(otherwise) = otherwise {
                    if !clauses.is_empty() {
                        write!(f, "; ")?;
                    }
                    write!(f, "otherwise {}", otherwise)?;
                }
                write!(f, "]")
            }
            FormulaExpression::Average(references) => {
                write!(f, "average [{}]", references.join(", "))
            }
            FormulaExpression::Sum(references) => write!(f, "sum [{}]", references.join(", ")),
            FormulaExpression::AnyOf(conditions) => write_conditions(f, "any of", conditions),
            FormulaExpression::AllOf(conditions) => write_conditions(f, "all of", conditions),
            FormulaExpression::Unsupported => write!(f, "unsupported"),
        }
    }
}

fn write_conditions(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    conditions: &[Condition],
) -> fmt::Result {
    write!(f, "{} [", label)?;
    for (index, condition) in conditions.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", condition)?;
    }
    write!(f, "]")
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Constant(n) => write!(f, "{}", n),
            Formula::Expression(expression) => write!(f, "{}", expression),
        }
    }
}
