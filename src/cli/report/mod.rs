//! Report command - summarizes an exported result file

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::config::AppConfig;
use crate::domain::RunSummary;
use crate::infrastructure::export::{load_results, LATEST_RESULTS_FILE};

/// Arguments for the report command
#[derive(Args, Clone, Debug)]
pub struct ReportArgs {
    /// Result file to summarize (defaults to the latest results)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Extra configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Print the summary table for a result file
pub async fn run(args: ReportArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    super::init_logging(&config);

    let path = args
        .file
        .unwrap_or_else(|| config.evaluation.results_dir.join(LATEST_RESULTS_FILE));

    let results = load_results(&path)?;
    let summary = RunSummary::from_results(&results);

    println!("Report for {}", path.display());
    println!();
    print!("{}", summary.render_table());

    Ok(())
}
