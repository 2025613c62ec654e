//! Poll statistics ("fun facts")
//!
//! A catalogue names which dotted-names to compute and how to aggregate them
//! across every participant of a poll. Situations are evaluated in parallel;
//! the registry is only ever read.

use crate::{Evaluator, FootprintError, FootprintResult, RuleRegistry, Situation};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// How per-participant values are combined into one fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Arithmetic mean over participants
    Mean,
    Sum,
    /// Fraction of participants whose value is non-zero
    Share,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunFactDefinition {
    pub key: String,
    #[serde(rename = "dottedName")]
    pub dotted_name: String,
    #[serde(default = "default_aggregation")]
    pub aggregation: Aggregation,
}

fn default_aggregation() -> Aggregation {
    Aggregation::Mean
}

/// Ordered list of facts to publish
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunFactsCatalogue {
    facts: Vec<FunFactDefinition>,
}

impl FunFactsCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str, source_id: &str) -> FootprintResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| FootprintError::catalogue(&e, source_id, Arc::from(json)))
    }

    pub fn with(
        mut self,
        key: impl Into<String>,
        dotted_name: impl Into<String>,
        aggregation: Aggregation,
    ) -> Self {
        self.facts.push(FunFactDefinition {
            key: key.into(),
            dotted_name: dotted_name.into(),
            aggregation,
        });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunFactDefinition> {
        self.facts.iter()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// Computed facts for one poll
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FunFacts {
    pub participants: usize,
    pub values: BTreeMap<String, f64>,
}

impl FunFacts {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

/// Compute every fact of `catalogue` over `situations`
///
/// With no situations every fact is `0`.
pub fn compute_fun_facts(
    evaluator: &Evaluator,
    catalogue: &FunFactsCatalogue,
    situations: &[Situation],
    rules: &RuleRegistry,
) -> FunFacts {
    // One row per participant, one column per fact
    let rows: Vec<Vec<f64>> = situations
        .par_iter()
        .map(|situation| {
            catalogue
                .iter()
                .map(|fact| evaluator.evaluate(&fact.dotted_name, situation, rules))
                .collect()
        })
        .collect();

    let participants = situations.len();
    let values = catalogue
        .iter()
        .enumerate()
        .map(|(column, fact)| {
            let column_values = rows.iter().map(|row| row[column]);
            (fact.key.clone(), aggregate(fact.aggregation, column_values, participants))
        })
        .collect();

    FunFacts {
        participants,
        values,
    }
}

fn aggregate(aggregation: Aggregation, values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    match aggregation {
        Aggregation::Sum => values.sum(),
        Aggregation::Mean => values.sum::<f64>() / count as f64,
        Aggregation::Share => values.filter(|value| *value != 0.0).count() as f64 / count as f64,
    }
}
