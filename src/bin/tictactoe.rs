//! tictactoe CLI - self-play trained tic-tac-toe agents
//!
//! This CLI provides a unified interface for:
//! - Training the first and second movers by self-play
//! - Playing the trained policies against each other
//! - Exhaustively evaluating a policy over the game tree
//! - Playing against the agents in the terminal

use anyhow::Result;
use clap::{Parser, Subcommand};
use td_tictactoe::cli::commands::{compete, evaluate, play, train};
use tracing::debug;

#[derive(Parser)]
#[command(name = "tictactoe")]
#[command(version, about = "Tic-tac-toe agents trained by self-play", long_about = None)]
struct Cli {
    /// Log level filter; RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train both agents by self-play
    Train(Box<train::TrainArgs>),

    /// Play the first and second policies against each other
    Compete(compete::CompeteArgs),

    /// Evaluate a policy against every opponent reply
    Evaluate(evaluate::EvaluateArgs),

    /// Play against the trained agents
    Play(play::PlayArgs),
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    debug!(log_level = %cli.log_level, "tracing initialized");

    match cli.command {
        Commands::Train(args) => train::execute(*args),
        Commands::Compete(args) => compete::execute(args),
        Commands::Evaluate(args) => evaluate::execute(args),
        Commands::Play(args) => play::execute(args),
    }
}
