//! Opportunity Dataset Generator
//!
//! Writes a reproducible synthetic sales-pipeline dataset as CSV and prints
//! its revenue totals.
//!
//! Usage:
//!   cargo run --release -- --count 5000 --seed 42 --output data/revenue_opportunities.csv
//!   cargo run --release -- --config generator.toml
//!
//! Settings are layered: defaults, then the TOML config file, then flags /
//! environment variables.
//!
//! # Exit Codes
//!
//! - 0: Dataset written
//! - 2: Configuration error
//! - 3: Runtime error (I/O)

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use revops_analytics::generator::parse_start_date;
use revops_analytics::logging::init_tracing;
use revops_analytics::{generate_dataset, GenerateError, GeneratorConfig};

#[derive(Parser, Debug)]
#[command(name = "revops_generate")]
#[command(about = "Generate a synthetic revenue-operations opportunity dataset")]
struct Args {
    /// Number of opportunities to generate
    #[arg(short = 'n', long, env = "REVOPS_COUNT")]
    count: Option<usize>,

    /// Random seed
    #[arg(long, env = "REVOPS_SEED")]
    seed: Option<u64>,

    /// First day of the one-year creation window (YYYY-MM-DD)
    #[arg(long, env = "REVOPS_START_DATE")]
    start_date: Option<String>,

    /// Output CSV path
    #[arg(
        short,
        long,
        env = "REVOPS_OUTPUT",
        default_value = "data/revenue_opportunities.csv"
    )]
    output: PathBuf,

    /// Generator config file (TOML)
    #[arg(short, long, env = "REVOPS_CONFIG_PATH")]
    config: Option<PathBuf>,
}

impl Args {
    fn resolve_config(&self) -> Result<GeneratorConfig, GenerateError> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading generator config from {}", path.display());
                GeneratorConfig::load(path)?
            }
            None => GeneratorConfig::default(),
        };

        if let Some(count) = self.count {
            config.n_opportunities = count;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(start) = &self.start_date {
            config.start_date = parse_start_date(start)?;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    init_tracing("revops_analytics=info,revops_generate=info");
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ GenerateError::Config(_)) => {
            error!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(3)
        }
    }
}

fn run(args: &Args) -> Result<(), GenerateError> {
    let config = args.resolve_config()?;

    println!("Generating revenue operations data...");
    let summary = generate_dataset(&config, &args.output)?;

    print!("{}", summary.render());
    println!("✓ Saved: {}", args.output.display());
    Ok(())
}
