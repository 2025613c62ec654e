use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use footprint::{Formula, FormulaExpression, FunFacts, RegistryEntry, RuleDefinition, RuleRegistry};

enum LineType {
    Clause,
    LastClause,
}

impl LineType {
    fn format_line(&self, content: &str) -> String {
        let symbol = match self {
            LineType::Clause => "├─",
            LineType::LastClause => "└─",
        };
        format!("{} {}\n", symbol, content)
    }
}

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn format_results(&self, results: &[(&str, f64)], raw: bool) -> String {
        if raw {
            let mut output = String::new();
            for (_, value) in results {
                output.push_str(&format!("{}\n", value));
            }
            return output;
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Dotted-name").set_alignment(CellAlignment::Left),
            Cell::new("Value").set_alignment(CellAlignment::Right),
        ]));
        for (name, value) in results {
            table.add_row(Row::from(vec![
                Cell::new(name),
                Cell::new(value).set_alignment(CellAlignment::Right),
            ]));
        }

        format!("{}\n", table)
    }

    pub fn format_rule(&self, name: &str, entry: &RegistryEntry) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.add_row(Row::from(vec![Cell::new(name)]));

        let content = match entry {
            RegistryEntry::Rule(rule) => self.format_definition(rule),
            RegistryEntry::Bare(Some(value)) => format!("{}", value),
            RegistryEntry::Bare(None) => "no value".to_string(),
        };
        let content = content.trim_end();
        if !content.is_empty() {
            table.add_row(Row::from(vec![Cell::new(content)]));
        }

        format!("{}\n", table)
    }

    fn format_definition(&self, rule: &RuleDefinition) -> String {
        let mut output = String::new();

        if let Some(condition) = &rule.applicable_if {
            output.push_str(&format!("applicable if: {}\n", condition));
        }
        if let Some(default_value) = &rule.default_value {
            output.push_str(&format!("default: {}\n", default_value));
        }

        match &rule.formula {
            None => {}
            Some(Formula::Constant(value)) => output.push_str(&format!("formula: {}\n", value)),
            Some(Formula::Expression(FormulaExpression::Variations { clauses, otherwise })) => {
                output.push_str("formula: variations\n");
                for (index, clause) in clauses.iter().enumerate() {
                    let line_type = if index + 1 == clauses.len() && otherwise.is_none() {
                        LineType::LastClause
                    } else {
                        LineType::Clause
                    };
                    let line = format!("if {} then {}", clause.condition, clause.then);
                    output.push_str(&line_type.format_line(&line));
                }
                if let Some(otherwise) = otherwise {
                    let line = format!("otherwise {}", otherwise);
                    output.push_str(&LineType::LastClause.format_line(&line));
                }
            }
            Some(Formula::Expression(expression)) => {
                output.push_str(&format!("formula: {}\n", expression));
            }
        }

        output
    }

    pub fn format_rule_list(&self, rules: &RuleRegistry, names: &[&str]) -> String {
        let mut output = format!("Model contains {} rules\n\n", rules.len());

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Dotted-name").set_alignment(CellAlignment::Left),
            Cell::new("Formula").set_alignment(CellAlignment::Left),
        ]));
        for name in names {
            table.add_row(Row::from(vec![name.to_string(), shape(rules.get(name))]));
        }

        output.push_str(&format!("{}\n", table));
        output
    }

    pub fn format_fun_facts(&self, facts: &FunFacts) -> String {
        let mut output = format!("Computed over {} participants\n\n", facts.participants);

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Fact").set_alignment(CellAlignment::Left),
            Cell::new("Value").set_alignment(CellAlignment::Right),
        ]));
        for (key, value) in &facts.values {
            table.add_row(Row::from(vec![
                Cell::new(key),
                Cell::new(value).set_alignment(CellAlignment::Right),
            ]));
        }

        output.push_str(&format!("{}\n", table));
        output
    }
}

fn shape(entry: Option<&RegistryEntry>) -> String {
    match entry {
        Some(RegistryEntry::Rule(rule)) => match &rule.formula {
            Some(Formula::Constant(_)) => "constant".to_string(),
            Some(Formula::Expression(expression)) => expression.kind().to_string(),
            None => "question".to_string(),
        },
        Some(RegistryEntry::Bare(_)) => "constant".to_string(),
        None => String::new(),
    }
}
