//! List command - shows the test cases a run would evaluate

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::config::AppConfig;
use crate::domain::TestCase;
use crate::infrastructure::test_case::load;

/// Arguments for the list command
#[derive(Args, Clone, Debug)]
pub struct ListArgs {
    /// Directory holding test case files (overrides config)
    #[arg(long)]
    pub test_cases_dir: Option<PathBuf>,

    /// Extra configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Print every test case found in the configured directory
pub async fn run(args: ListArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    super::init_logging(&config);

    let dir = args
        .test_cases_dir
        .unwrap_or_else(|| config.evaluation.test_cases_dir.clone());

    let test_cases = load(&dir).await?;
    print!("{}", render_listing(&test_cases));

    Ok(())
}

fn render_listing(test_cases: &[TestCase]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{:<30} {:<16} {:<10} {:>8}\n",
        "TEST CASE", "CATEGORY", "DIFFICULTY", "CRITERIA"
    ));

    for test_case in test_cases {
        let marker = if test_case.is_parse_failure() { " (unparseable)" } else { "" };
        out.push_str(&format!(
            "{:<30} {:<16} {:<10} {:>8}{}\n",
            test_case.name(),
            test_case.category(),
            test_case.difficulty(),
            test_case.expectations().len(),
            marker
        ));
    }

    out.push_str(&format!("\n{} test case(s)\n", test_cases.len()));
    out
}
