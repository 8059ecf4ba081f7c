//! Evaluate command - walk the whole game tree against one trained policy

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{
        commands::{compete::load_agent, train::parse_player_token},
        output::{format_number, print_kv, print_section},
    },
    pipeline::{Replies, exhaustive_outcomes},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained policy against every opponent reply")]
pub struct EvaluateArgs {
    /// Path to the policy file
    pub policy: PathBuf,

    /// Which token the policy plays (`x` or `o`)
    #[arg(long, default_value = "x")]
    pub player: String,

    /// Which token makes the first move (`x` or `o`)
    #[arg(long, default_value = "x")]
    pub first_player: String,

    /// Opponent replies to branch on
    #[arg(long, value_enum, default_value_t = Replies::All)]
    pub replies: Replies,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let player = parse_player_token(&args.player, "--player")?;
    let first_player = parse_player_token(&args.first_player, "--first-player")?;
    let agent = load_agent(&args.policy, player, 0.0, None)?;

    let evaluation = exhaustive_outcomes(&agent, first_player, args.replies)?;

    print_section("Exhaustive Evaluation");
    print_kv("Policy", &args.policy.display().to_string());
    print_kv("Plays", &player.to_string());
    print_kv("Moves first", &first_player.to_string());
    print_kv("Replies", &format!("{:?}", args.replies).to_lowercase());
    print_kv("Lines", &format_number(evaluation.outcomes.total()));
    print_kv("Wins", &format_number(evaluation.wins()));
    print_kv("Draws", &format_number(evaluation.draws()));
    print_kv("Losses", &format_number(evaluation.losses()));
    if evaluation.never_loses() {
        println!("\nThe policy never loses.");
    }

    Ok(())
}
