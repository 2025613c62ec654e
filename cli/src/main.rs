mod error_formatter;
mod formatter;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use footprint::{
    compute_fun_facts, Evaluator, FunFactsCatalogue, ResourceLimits, RuleRegistry, Situation,
};
use formatter::Formatter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "footprint")]
#[command(about = "Recompute carbon footprint metrics from stored answers.")]
#[command(
    long_about = "Footprint evaluates single metrics of a compiled carbon footprint model against participant answers.\nThe CLI lets you evaluate dotted-names, inspect rules, and compute poll statistics (fun facts)."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate dotted-names and display results
    ///
    /// Loads the compiled model, reads the optional situation, and prints the
    /// value of every requested dotted-name.
    Run {
        /// Compiled model (JSON object keyed by dotted-name)
        model: PathBuf,
        /// Dotted-names to evaluate
        ///
        /// Examples: "transport", "transport . voiture . km"
        #[arg(required = true)]
        names: Vec<String>,
        /// Situation file (JSON object of answers keyed by dotted-name)
        #[arg(short = 's', long)]
        situation: Option<PathBuf>,
        /// Output raw values only (for piping to other tools)
        #[arg(short = 'r', long)]
        raw: bool,
    },
    /// Show a rule's decoded definition
    Show {
        /// Compiled model (JSON object keyed by dotted-name)
        model: PathBuf,
        /// Dotted-name of the rule to show
        name: String,
    },
    /// List rules with the shape of their formula
    List {
        /// Compiled model (JSON object keyed by dotted-name)
        model: PathBuf,
        /// Only list dotted-names starting with this prefix
        #[arg(short = 'p', long)]
        prefix: Option<String>,
    },
    /// Compute poll statistics over many situations
    ///
    /// Evaluates every fact of the catalogue for every participant and
    /// aggregates the results.
    Stats {
        /// Compiled model (JSON object keyed by dotted-name)
        model: PathBuf,
        /// Situations file (JSON array of answer objects)
        #[arg(short = 's', long)]
        situations: PathBuf,
        /// Fun facts catalogue (JSON array of {key, dottedName, aggregation})
        #[arg(short = 'c', long)]
        catalogue: PathBuf,
        /// Output JSON instead of a table
        #[arg(short = 'r', long)]
        raw: bool,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run {
            model,
            names,
            situation,
            raw,
        } => run_command(model, names, situation.as_deref(), *raw),
        Commands::Show { model, name } => show_command(model, name),
        Commands::List { model, prefix } => list_command(model, prefix.as_deref()),
        Commands::Stats {
            model,
            situations,
            catalogue,
            raw,
        } => stats_command(model, situations, catalogue, *raw),
    };

    if let Err(e) = result {
        // Decode errors carry source locations; render them with context
        if let Some(footprint_err) = e.downcast_ref::<footprint::FootprintError>() {
            eprintln!("{}", error_formatter::format_error(footprint_err));
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "footprint=warn".into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn run_command(model: &Path, names: &[String], situation: Option<&Path>, raw: bool) -> Result<()> {
    let evaluator = Evaluator::with_limits(ResourceLimits::default());
    let rules = load_model(model, evaluator.limits())?;
    let situation = match situation {
        Some(path) => {
            let source_id = path.to_string_lossy().to_string();
            Situation::from_json_str(&read(path)?, &source_id, evaluator.limits())?
        }
        None => Situation::new(),
    };
    debug!(answers = situation.len(), "loaded situation");

    let results: Vec<(&str, f64)> = names
        .iter()
        .map(|name| (name.as_str(), evaluator.evaluate(name, &situation, &rules)))
        .collect();

    let formatter = Formatter::default();
    print!("{}", formatter.format_results(&results, raw));
    Ok(())
}

fn show_command(model: &Path, name: &str) -> Result<()> {
    let rules = load_model(model, &ResourceLimits::default())?;

    let Some(entry) = rules.get(name) else {
        eprintln!("Error: Rule '{}' not found", name);
        std::process::exit(1);
    };

    let formatter = Formatter::default();
    print!("{}", formatter.format_rule(name, entry));
    Ok(())
}

fn list_command(model: &Path, prefix: Option<&str>) -> Result<()> {
    let rules = load_model(model, &ResourceLimits::default())?;

    let names: Vec<&str> = rules
        .names()
        .into_iter()
        .filter(|name| prefix.map_or(true, |prefix| name.starts_with(prefix)))
        .collect();

    let formatter = Formatter::default();
    print!("{}", formatter.format_rule_list(&rules, &names));
    Ok(())
}

fn stats_command(model: &Path, situations: &Path, catalogue: &Path, raw: bool) -> Result<()> {
    let evaluator = Evaluator::with_limits(ResourceLimits::default());
    let rules = load_model(model, evaluator.limits())?;

    let source_id = situations.to_string_lossy().to_string();
    let situations =
        Situation::many_from_json_str(&read(situations)?, &source_id, evaluator.limits())?;

    let source_id = catalogue.to_string_lossy().to_string();
    let catalogue = FunFactsCatalogue::from_json_str(&read(catalogue)?, &source_id)?;

    info!(
        participants = situations.len(),
        facts = catalogue.len(),
        "computing fun facts"
    );
    let facts = compute_fun_facts(&evaluator, &catalogue, &situations, &rules);

    if raw {
        println!("{}", serde_json::to_string_pretty(&facts)?);
    } else {
        let formatter = Formatter::default();
        print!("{}", formatter.format_fun_facts(&facts));
    }
    Ok(())
}

fn load_model(path: &Path, limits: &ResourceLimits) -> Result<RuleRegistry> {
    let source_id = path.to_string_lossy().to_string();
    Ok(RuleRegistry::from_json_str(&read(path)?, &source_id, limits)?)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
