use clap::Parser;
use llm_eval_harness::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => cli::run::run(args).await,
        Command::Report(args) => cli::report::run(args).await,
        Command::List(args) => cli::list::run(args).await,
    }
}
