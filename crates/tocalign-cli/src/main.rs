//! tocalign CLI - align textbook tables of contents from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Align one textbook against a base textbook and print the report
//! tocalign base.json other.json
//!
//! # Score the alignment against an expert mapping
//! tocalign base.json other.json --expert expert.json
//!
//! # Iterative passes, custom thresholds, dataset export
//! tocalign base.json other.json --iterative --upper-threshold 0.7 --export dataset.jsonl
//!
//! # Show help
//! tocalign --help
//! ```

mod config;
mod integrate;
mod output;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tocalign_core::export::write_results;
use tocalign_core::textbook::{DocumentLoader, JsonLoader};
use tracing_subscriber::EnvFilter;

/// tocalign textbook alignment CLI.
///
/// Matches every section of the other textbooks to its most similar section
/// of the base textbook with a TF-IDF pass followed by an embedding pass.
#[derive(Parser)]
#[command(name = "tocalign", version, about)]
struct Cli {
    /// Textbook JSON files, base textbook first
    #[arg(required = true)]
    textbooks: Vec<PathBuf>,

    /// Expert mapping JSON file to evaluate against (needs exactly one other textbook)
    #[arg(long)]
    expert: Option<PathBuf>,

    /// Pipeline configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Threshold of the TF-IDF pass
    #[arg(long)]
    upper_threshold: Option<f64>,

    /// Threshold of the embedding pass
    #[arg(long)]
    lower_threshold: Option<f64>,

    /// Integrate sections one at a time in shuffled order
    #[arg(long)]
    iterative: bool,

    /// Shuffle seed for iterative passes
    #[arg(long)]
    seed: Option<u64>,

    /// Write the labelled dataset as JSON lines (bare file names go to the data directory)
    #[arg(long)]
    export: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> config::Overrides {
        config::Overrides {
            upper_threshold: self.upper_threshold,
            lower_threshold: self.lower_threshold,
            seed: self.seed,
            iterative: self.iterative,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut pipeline = config::load_pipeline_config(cli.config.as_deref())?;
    cli.overrides().apply(&mut pipeline);

    if cli.expert.is_some() && cli.textbooks.len() != 2 {
        bail!("--expert needs exactly one textbook besides the base textbook");
    }

    let (base, others) = JsonLoader::new(&cli.textbooks)
        .load()
        .context("Failed to load textbooks")?;

    let session = integrate::run(&base, &others, &pipeline, !cli.json)?;

    let metrics = match &cli.expert {
        Some(path) => Some(integrate::evaluate(&session, path)?),
        None => None,
    };

    if let Some(export) = &cli.export {
        let path = config::resolve_export_path(export)?;
        let written = write_results(&session.dataset(), &path)
            .with_context(|| format!("Failed to export dataset to {}", path.display()))?;
        eprintln!("Exported {} records to {}", written, path.display());
    }

    let output = if cli.json {
        output::format_json(&session, metrics.as_ref())
    } else {
        output::format_human(&session, metrics.as_ref())
    };
    println!("{}", output);

    Ok(())
}
