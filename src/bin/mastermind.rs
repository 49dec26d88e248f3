//! Mastermind CLI - Train and inspect code-breaking agents

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mastermind")]
#[command(version, about = "Mastermind environment and Q-learning agent", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a learner and evaluate it
    Train(Box<mastermind::cli::commands::train::TrainArgs>),

    /// Score a guess against a secret
    Score(mastermind::cli::commands::score::ScoreArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Train(args) => mastermind::cli::commands::train::execute(*args),
        Commands::Score(args) => mastermind::cli::commands::score::execute(args),
    }
}
