use crate::{
    evaluate, Branch, Condition, DefaultValue, FormulaExpression, RegistryEntry, RuleDefinition,
    RuleRegistry, Situation, VariationClause,
};

fn sum(references: &[&str]) -> FormulaExpression {
    FormulaExpression::Sum(references.iter().map(|r| r.to_string()).collect())
}

fn variations(clauses: Vec<(&str, Branch)>, otherwise: Option<Branch>) -> FormulaExpression {
    FormulaExpression::Variations {
        clauses: clauses
            .into_iter()
            .map(|(condition, then)| VariationClause {
                condition: Condition::new(condition),
                then,
            })
            .collect(),
        otherwise,
    }
}

#[test]
fn test_missing_rule_is_zero() {
    let rules = RuleRegistry::new();
    let situation = Situation::new().with("a", 3);
    assert_eq!(evaluate("a", &situation, &rules), 0.0);
}

#[test]
fn test_constant_formula() {
    let rules = RuleRegistry::new().with("k", RuleDefinition::new().with_formula(42.0));
    assert_eq!(evaluate("k", &Situation::new(), &rules), 42.0);
    assert_eq!(evaluate("k", &Situation::new().with("k", 1), &rules), 42.0);
}

#[test]
fn test_bare_entries() {
    let rules = RuleRegistry::new()
        .with("numeric", RegistryEntry::Bare(Some(7.0)))
        .with("text", RegistryEntry::Bare(None));
    assert_eq!(evaluate("numeric", &Situation::new(), &rules), 7.0);
    assert_eq!(evaluate("text", &Situation::new(), &rules), 0.0);
}

#[test]
fn test_rule_without_formula_is_zero() {
    let rules = RuleRegistry::new().with(
        "question",
        RuleDefinition::new().with_default(DefaultValue::Number(5.0)),
    );
    assert_eq!(evaluate("question", &Situation::new(), &rules), 0.0);
}

#[test]
fn test_sum_of_constant_rules() {
    let rules = RuleRegistry::new()
        .with("a", RuleDefinition::new().with_formula(sum(&["b", "c"])))
        .with("b", RuleDefinition::new().with_formula(5.0))
        .with("c", RuleDefinition::new().with_formula(3.0));
    assert_eq!(evaluate("a", &Situation::new(), &rules), 8.0);
}

#[test]
fn test_sum_mixes_answers_and_defaults() {
    let rules = RuleRegistry::new()
        .with(
            "total",
            RuleDefinition::new().with_formula(sum(&["total . a", "total . b", "absent"])),
        )
        .with(
            "total . a",
            RuleDefinition::new().with_default(DefaultValue::Number(10.0)),
        )
        .with(
            "total . b",
            RuleDefinition::new().with_default(DefaultValue::Number(20.0)),
        );
    let situation = Situation::new().with("total . b", 2);
    assert_eq!(evaluate("total", &situation, &rules), 12.0);
}

#[test]
fn test_sum_references_are_not_merged() {
    let rules = RuleRegistry::new()
        .with("ns . total", RuleDefinition::new().with_formula(sum(&["a"])))
        .with("ns . a", RuleDefinition::new().with_formula(4.0));
    assert_eq!(evaluate("ns . total", &Situation::new(), &rules), 0.0);
}

#[test]
fn test_average_uses_only_first_reference() {
    let rules = RuleRegistry::new().with(
        "m",
        RuleDefinition::new().with_formula(FormulaExpression::Average(vec![
            "x".to_string(),
            "y".to_string(),
        ])),
    );
    let situation = Situation::new().with("x", 10).with("y", 30);
    assert_eq!(evaluate("m", &situation, &rules), 10.0);
}

#[test]
fn test_empty_average_is_zero() {
    let rules = RuleRegistry::new().with(
        "m",
        RuleDefinition::new().with_formula(FormulaExpression::Average(vec![])),
    );
    assert_eq!(evaluate("m", &Situation::new(), &rules), 0.0);
}

#[test]
fn test_any_of() {
    let rules = RuleRegistry::new().with(
        "any",
        RuleDefinition::new().with_formula(FormulaExpression::AnyOf(vec![
            Condition::new("a"),
            Condition::new("b > 3"),
        ])),
    );
    assert_eq!(evaluate("any", &Situation::new().with("b", 4), &rules), 1.0);
    assert_eq!(evaluate("any", &Situation::new().with("a", "oui"), &rules), 1.0);
    assert_eq!(evaluate("any", &Situation::new().with("b", 2), &rules), 0.0);
}

#[test]
fn test_all_of() {
    let rules = RuleRegistry::new().with(
        "all",
        RuleDefinition::new().with_formula(FormulaExpression::AllOf(vec![
            Condition::new("a"),
            Condition::new("b > 3"),
        ])),
    );
    let both = Situation::new().with("a", "oui").with("b", 4);
    let one = Situation::new().with("a", "oui").with("b", 1);
    assert_eq!(evaluate("all", &both, &rules), 1.0);
    assert_eq!(evaluate("all", &one, &rules), 0.0);
}

#[test]
fn test_empty_condition_lists() {
    let rules = RuleRegistry::new()
        .with(
            "any",
            RuleDefinition::new().with_formula(FormulaExpression::AnyOf(vec![])),
        )
        .with(
            "all",
            RuleDefinition::new().with_formula(FormulaExpression::AllOf(vec![])),
        );
    assert_eq!(evaluate("any", &Situation::new(), &rules), 0.0);
    assert_eq!(evaluate("all", &Situation::new(), &rules), 1.0);
}

#[test]
fn test_malformed_condition_never_matches() {
    let rules = RuleRegistry::new().with(
        "all",
        RuleDefinition::new()
            .with_formula(FormulaExpression::AllOf(vec![Condition::malformed()])),
    );
    assert_eq!(evaluate("all", &Situation::new(), &rules), 0.0);
}

#[test]
fn test_variations_first_match_wins() {
    let rules = RuleRegistry::new().with(
        "transport . voiture . facteur",
        RuleDefinition::new().with_formula(variations(
            vec![
                ("km > 1000", Branch::Number(0.2)),
                ("km > 10", Branch::Number(0.3)),
            ],
            None,
        )),
    );
    let situation = Situation::new().with("transport . voiture . km", 5000);
    assert_eq!(
        evaluate("transport . voiture . facteur", &situation, &rules),
        0.2
    );
    let situation = Situation::new().with("transport . voiture . km", 50);
    assert_eq!(
        evaluate("transport . voiture . facteur", &situation, &rules),
        0.3
    );
}

#[test]
fn test_variations_text_branch_is_coerced() {
    let rules = RuleRegistry::new().with(
        "v",
        RuleDefinition::new().with_formula(variations(
            vec![
                ("a", Branch::Text("12".to_string())),
                ("b", Branch::Text("deux".to_string())),
            ],
            None,
        )),
    );
    assert_eq!(evaluate("v", &Situation::new().with("a", "oui"), &rules), 12.0);
    assert_eq!(evaluate("v", &Situation::new().with("b", "oui"), &rules), 0.0);
}

#[test]
fn test_variations_nan_branch_is_zero() {
    let rules = RuleRegistry::new().with(
        "v",
        RuleDefinition::new()
            .with_formula(variations(vec![("a", Branch::Number(f64::NAN))], None)),
    );
    assert_eq!(evaluate("v", &Situation::new().with("a", "oui"), &rules), 0.0);
}

#[test]
fn test_variations_nested_formula_branch() {
    let rules = RuleRegistry::new().with(
        "v",
        RuleDefinition::new().with_formula(variations(
            vec![("a", Branch::Formula(Box::new(sum(&["x", "y"]))))],
            None,
        )),
    );
    let situation = Situation::new().with("a", "oui").with("x", 1).with("y", 2);
    assert_eq!(evaluate("v", &situation, &rules), 3.0);
}

#[test]
fn test_variations_bare_fallback_is_zero() {
    let rules = RuleRegistry::new().with(
        "v",
        RuleDefinition::new().with_formula(variations(
            vec![("a", Branch::Number(1.0))],
            Some(Branch::Number(99.0)),
        )),
    );
    assert_eq!(evaluate("v", &Situation::new(), &rules), 0.0);
}

#[test]
fn test_variations_structured_fallback_is_evaluated() {
    let rules = RuleRegistry::new().with(
        "v",
        RuleDefinition::new().with_formula(variations(
            vec![("a", Branch::Number(1.0))],
            Some(Branch::Formula(Box::new(sum(&["x"])))),
        )),
    );
    let situation = Situation::new().with("x", 6);
    assert_eq!(evaluate("v", &situation, &rules), 6.0);
}

#[test]
fn test_unsupported_formula_is_zero() {
    let rules = RuleRegistry::new().with(
        "u",
        RuleDefinition::new().with_formula(FormulaExpression::Unsupported),
    );
    assert_eq!(evaluate("u", &Situation::new(), &rules), 0.0);
}

#[test]
fn test_evaluation_is_idempotent() {
    let rules = RuleRegistry::new()
        .with("a", RuleDefinition::new().with_formula(sum(&["b", "c"])))
        .with(
            "b",
            RuleDefinition::new().with_default(DefaultValue::Number(1.25)),
        );
    let situation = Situation::new().with("c", 2);
    let first = evaluate("a", &situation, &rules);
    let second = evaluate("a", &situation, &rules);
    assert_eq!(first, second);
    assert_eq!(first, 3.25);
}
