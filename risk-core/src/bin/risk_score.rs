//! risk-score - score a CSV batch from the command line
//!
//! Prints the model status, then either the validation messages or the
//! batch summary, and optionally writes the scored table.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use santerisk_core::constants::{get_default_threshold, get_model_path, APP_NAME, APP_VERSION};
use santerisk_core::logic::dataset::save_csv;
use santerisk_core::{BatchOptions, RawTable, RequestError, RiskLabel, RiskService};

#[derive(Parser)]
#[command(name = "risk-score")]
#[command(about = "Score a health-risk CSV batch", long_about = None)]
struct Cli {
    /// Input CSV (id, stress, ics, scg, age, poste_nuit, ...)
    input: PathBuf,

    /// Classification threshold in [0, 1] (default: RISK_DEFAULT_THRESHOLD or 0.5)
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Model artifact (default: RISK_MODEL_PATH or modele_risque.json)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Write scored rows to this CSV
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compute local attributions for the first rows
    #[arg(long)]
    explain: bool,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("{} v{}", APP_NAME, APP_VERSION);

    let model_path = cli.model.unwrap_or_else(|| PathBuf::from(get_model_path()));
    let threshold = cli.threshold.unwrap_or_else(get_default_threshold);

    let service = RiskService::from_path(&model_path);
    println!("{}", service.model().status_message());

    let table = RawTable::from_path(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;

    let outcome = match service.score_table(&table, threshold, BatchOptions { explain: cli.explain }) {
        Ok(outcome) => outcome,
        Err(RequestError::Validation(report)) => {
            for message in report.messages() {
                eprintln!("{}", message);
            }
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e.into()),
    };

    for (label, value) in outcome.summary.to_pairs() {
        println!("{:<14} {}", label, value);
    }
    for label in RiskLabel::ALL {
        println!("  {:<12} {}", label.as_str(), outcome.summary.class_counts.get(label));
    }

    if !outcome.importances.is_empty() {
        println!();
        println!("Importance des variables:");
        for item in &outcome.importances {
            println!("  {:<12} {:+.3}", item.name, item.weight);
        }
    }

    if let Some(explanation) = &outcome.explanation {
        println!();
        println!(
            "SHAP ({} lignes, valeur de base {:.3}):",
            explanation.values.len(),
            explanation.base_value
        );
        for (name, value) in explanation.mean_abs() {
            println!("  {:<12} {:.4}", name, value);
        }
    }

    for warning in &outcome.warnings {
        eprintln!("{}", warning);
    }

    if let Some(output) = &cli.output {
        save_csv(&outcome.scored, output)
            .with_context(|| format!("writing {}", output.display()))?;
        println!("Résultats écrits dans {}", output.display());
    }

    Ok(ExitCode::SUCCESS)
}
