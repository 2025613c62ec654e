//! Participant answers keyed by dotted-name

use crate::evaluator::operations::coerce_number;
use crate::{FootprintError, FootprintResult, ResourceLimits};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A single stored answer
#[derive(Debug, Clone, PartialEq)]
pub enum SituationValue {
    Number(f64),
    Text(String),
    /// Any non-scalar shape: the question was shown but not answered
    Unanswered,
}

impl SituationValue {
    /// Numeric coercion of a stored answer
    ///
    /// Strings are trimmed and parsed; a blank string is `0`. Returns `None`
    /// for placeholders and anything that does not coerce to a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SituationValue::Number(n) => n.is_finite().then_some(*n),
            SituationValue::Text(s) => coerce_number(s),
            SituationValue::Unanswered => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SituationValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_unanswered(&self) -> bool {
        matches!(self, SituationValue::Unanswered)
    }
}

impl From<f64> for SituationValue {
    fn from(value: f64) -> Self {
        SituationValue::Number(value)
    }
}

impl From<i32> for SituationValue {
    fn from(value: i32) -> Self {
        SituationValue::Number(f64::from(value))
    }
}

impl From<&str> for SituationValue {
    fn from(value: &str) -> Self {
        SituationValue::Text(value.to_string())
    }
}

impl From<String> for SituationValue {
    fn from(value: String) -> Self {
        SituationValue::Text(value)
    }
}

impl fmt::Display for SituationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SituationValue::Number(n) => write!(f, "{}", n),
            SituationValue::Text(s) => write!(f, "{}", s),
            SituationValue::Unanswered => write!(f, "?"),
        }
    }
}

impl<'de> Deserialize<'de> for SituationValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(n) => SituationValue::Number(n),
                None => SituationValue::Unanswered,
            },
            serde_json::Value::String(s) => SituationValue::Text(s),
            _ => SituationValue::Unanswered,
        })
    }
}

impl Serialize for SituationValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SituationValue::Number(n) => serializer.serialize_f64(*n),
            SituationValue::Text(s) => serializer.serialize_str(s),
            SituationValue::Unanswered => serializer.serialize_unit(),
        }
    }
}

/// Answers of one participant
///
/// Read-only during evaluation. Keys missing from the map are unanswered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Situation {
    answers: HashMap<String, SituationValue>,
}

impl Situation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a situation from a JSON object
    pub fn from_json_str(
        json: &str,
        source_id: &str,
        limits: &ResourceLimits,
    ) -> FootprintResult<Self> {
        if json.len() > limits.max_situation_bytes {
            return Err(FootprintError::input_too_large(
                "max_situation_bytes",
                limits.max_situation_bytes,
                json.len(),
            ));
        }
        serde_json::from_str(json)
            .map_err(|e| FootprintError::situation(&e, source_id, Arc::from(json)))
    }

    /// Decode a JSON array of situations, as exported for a whole poll
    pub fn many_from_json_str(
        json: &str,
        source_id: &str,
        limits: &ResourceLimits,
    ) -> FootprintResult<Vec<Self>> {
        if json.len() > limits.max_batch_bytes {
            return Err(FootprintError::input_too_large(
                "max_batch_bytes",
                limits.max_batch_bytes,
                json.len(),
            ));
        }
        serde_json::from_str(json)
            .map_err(|e| FootprintError::situation(&e, source_id, Arc::from(json)))
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<SituationValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SituationValue>) {
        self.answers.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&SituationValue> {
        self.answers.get(name)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SituationValue)> {
        self.answers.iter()
    }
}

impl FromIterator<(String, SituationValue)> for Situation {
    fn from_iter<I: IntoIterator<Item = (String, SituationValue)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}
