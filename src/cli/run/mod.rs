//! Run command - evaluates every test case against every requested model

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::infrastructure::observability::init_metrics;
use crate::infrastructure::reporting::TracingReporter;

/// Arguments for the run command
#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Comma-separated model identifiers (`provider:model`)
    #[arg(long, value_delimiter = ',', default_value = "simulated:default")]
    pub models: Vec<String>,

    /// Judge persona (defaults to `evaluation.default_persona`)
    #[arg(long)]
    pub persona: Option<String>,

    /// Evaluate one work item at a time, in file x model order
    #[arg(long)]
    pub sequential: bool,

    /// Parallel worker count (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub workers: Option<u32>,

    /// Judge model identifier (overrides config)
    #[arg(long)]
    pub judge_model: Option<String>,

    /// Directory holding test case files (overrides config)
    #[arg(long)]
    pub test_cases_dir: Option<PathBuf>,

    /// Directory receiving exported results (overrides config)
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Extra configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip writing result files
    #[arg(long)]
    pub no_export: bool,
}

impl RunArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(workers) = self.workers {
            config.evaluation.max_workers = workers as usize;
        }
        if let Some(ref judge_model) = self.judge_model {
            config.evaluation.judge_model = judge_model.clone();
        }
        if let Some(ref dir) = self.test_cases_dir {
            config.evaluation.test_cases_dir = dir.clone();
        }
        if let Some(ref dir) = self.results_dir {
            config.evaluation.results_dir = dir.clone();
        }
    }
}

/// Run the evaluation suite
pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);
    config.validate()?;

    super::init_logging(&config);
    let metrics = init_metrics(&config.metrics);

    let persona = args
        .persona
        .clone()
        .unwrap_or_else(|| config.evaluation.default_persona.clone());

    let mut service = crate::build_evaluation_service(&config, Arc::new(TracingReporter::new()))?;

    service
        .run_suite(&args.models, &persona, !args.sequential)
        .await?;

    if args.no_export {
        info!("Skipping export (--no-export)");
    } else if let Some(files) = service.export()? {
        println!("Results written to {}", files.latest.display());
        println!("Run archived at {}", files.run.display());
    }

    println!();
    print!("{}", service.summary().render_table());

    if let Some(metrics) = metrics {
        let path = config.metrics.output_path(&config.evaluation.results_dir);
        match metrics.write_to(&path) {
            Ok(()) => info!(path = %path.display(), "Wrote metrics"),
            Err(e) => warn!(error = %e, "Failed to write metrics"),
        }
    }

    Ok(())
}
