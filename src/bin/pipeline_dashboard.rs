//! Pipeline Dashboard
//!
//! Loads an exported opportunity dataset, computes the dashboard panels and
//! prints the panel tables with an executive summary. The full report is
//! also written as JSON.
//!
//! Usage:
//!   cargo run --release --bin pipeline_dashboard -- --input data/revenue_opportunities.csv
//!   cargo run --release --bin pipeline_dashboard -- --report out/dashboard.json --quiet
//!
//! # Exit Codes
//!
//! - 0: Report produced
//! - 3: Dataset could not be read or report could not be written

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use revops_analytics::dashboard::DashboardReport;
use revops_analytics::dataset::read_csv_file;
use revops_analytics::logging::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "pipeline_dashboard")]
#[command(about = "Summarize a revenue-operations opportunity dataset")]
struct Cli {
    /// Dataset CSV produced by revops_generate
    #[arg(short, long, default_value = "data/revenue_opportunities.csv")]
    input: PathBuf,

    /// JSON report output path
    #[arg(short, long, default_value = "assets/revenue_dashboard.json")]
    report: PathBuf,

    /// Skip the printed panel tables and summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    init_tracing("revops_analytics=info,pipeline_dashboard=info");
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(3)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let records = read_csv_file(&cli.input)
        .with_context(|| format!("Failed to load dataset: {}", cli.input.display()))?;
    info!(rows = records.len(), "loaded dataset");

    let report = DashboardReport::build(&records);
    report
        .write_json(&cli.report)
        .with_context(|| format!("Failed to write report: {}", cli.report.display()))?;

    if !cli.quiet {
        println!("{}", report.render_text());
    }
    println!("✓ Dashboard report saved: {}", cli.report.display());
    Ok(())
}
