//! CLI module for the LLM evaluation harness
//!
//! Subcommands:
//! - `run`: evaluate test cases against one or more models and export the results
//! - `report`: summarize a previously exported result file
//! - `list`: show the test cases found in the test case directory

pub mod list;
pub mod report;
pub mod run;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// LLM evaluation harness - benchmark models against test cases with an LLM judge
#[derive(Parser)]
#[command(name = "llm-eval")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the evaluation suite
    Run(run::RunArgs),

    /// Print a summary of exported results
    Report(report::ReportArgs),

    /// List discovered test cases
    List(list::ListArgs),
}

fn init_logging(config: &AppConfig) {
    logging::init_logging(&logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });
}
