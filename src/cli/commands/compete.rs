//! Compete command - play the two trained policies against each other

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    agent::Agent,
    app::AgentConfig,
    cli::output::{format_number, print_kv, print_section},
    pipeline::compete,
    session::{FIRST_POLICY_FILE, SECOND_POLICY_FILE},
    tictactoe::Player,
};

/// Agent for `player` with the policy at `path`; load failures are errors.
pub(crate) fn load_agent(
    path: &Path,
    player: Player,
    epsilon: f64,
    seed: Option<u64>,
) -> Result<Agent> {
    let mut config = AgentConfig::new(player).with_epsilon(epsilon);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let mut agent = Agent::from_config(&config)?;
    agent
        .load_policy(path)
        .with_context(|| format!("Failed to load policy from {}", path.display()))?;
    Ok(agent)
}

#[derive(Parser, Debug)]
#[command(about = "Play the first and second policies against each other")]
pub struct CompeteArgs {
    /// Policy of the agent that moves first (X)
    #[arg(long, default_value = FIRST_POLICY_FILE)]
    pub first_policy: PathBuf,

    /// Policy of the agent that moves second (O)
    #[arg(long, default_value = SECOND_POLICY_FILE)]
    pub second_policy: PathBuf,

    /// Number of games
    #[arg(long, short = 'g', default_value_t = 1000)]
    pub games: usize,

    /// Exploration rate of both agents
    #[arg(long, default_value_t = 0.0)]
    pub epsilon: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: CompeteArgs) -> Result<()> {
    let mut first = load_agent(&args.first_policy, Player::X, args.epsilon, args.seed)?;
    let mut second = load_agent(
        &args.second_policy,
        Player::O,
        args.epsilon,
        args.seed.map(|seed| seed.wrapping_add(1)),
    )?;

    let report = compete(&mut first, &mut second, args.games)?;
    let outcomes = report.outcomes;

    print_section("Competition Results");
    print_kv("Games", &format_number(report.games));
    print_kv(
        "First wins",
        &format!(
            "{} ({:.1}%)",
            outcomes.first_wins,
            outcomes.first_win_rate() * 100.0
        ),
    );
    print_kv(
        "Second wins",
        &format!(
            "{} ({:.1}%)",
            outcomes.second_wins,
            outcomes.second_win_rate() * 100.0
        ),
    );
    print_kv(
        "Draws",
        &format!("{} ({:.1}%)", outcomes.draws, outcomes.draw_rate() * 100.0),
    );

    Ok(())
}
