use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{EvaluateArgs, MergeArgs};

/// Vehicle axle merging and detector evaluation
#[derive(Debug, Parser)]
#[command(name = "annotool", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge adjacent single_axle boxes into grouped_axles
    Merge(MergeArgs),
    /// Precision/recall of predictions against ground truth
    Evaluate(EvaluateArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Merge(args) => commands::run_merge(args),
        Command::Evaluate(args) => commands::run_evaluate(args),
    }
}
