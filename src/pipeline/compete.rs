//! Head-to-head play between two agents without learning

use serde::{Deserialize, Serialize};
use tracing::info;

use super::training::play_episode;
use crate::{
    Error, Result,
    agent::Agent,
    tictactoe::{GameOutcome, Player},
};

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Finished games counted by which side won
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
}

impl OutcomeTally {
    /// Count one finished game. In-progress outcomes are ignored.
    pub fn record(&mut self, outcome: GameOutcome, first_player: Player) {
        match outcome {
            GameOutcome::Win(winner) if winner == first_player => self.first_wins += 1,
            GameOutcome::Win(_) => self.second_wins += 1,
            GameOutcome::Draw => self.draws += 1,
            GameOutcome::InProgress => {}
        }
    }

    pub fn total(&self) -> usize {
        self.first_wins + self.second_wins + self.draws
    }

    pub fn first_win_rate(&self) -> f64 {
        rate(self.first_wins, self.total())
    }

    pub fn second_win_rate(&self) -> f64 {
        rate(self.second_wins, self.total())
    }

    pub fn draw_rate(&self) -> f64 {
        rate(self.draws, self.total())
    }
}

impl std::ops::AddAssign for OutcomeTally {
    fn add_assign(&mut self, other: Self) {
        self.first_wins += other.first_wins;
        self.second_wins += other.second_wins;
        self.draws += other.draws;
    }
}

/// Result of [`compete`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionReport {
    pub games: usize,
    pub first_player: Player,
    pub outcomes: OutcomeTally,
}

/// Play `games` games with `first` always opening; neither table changes.
///
/// Agents keep their own ε, so two greedy agents replay the same game.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] when both agents play the same
/// symbol.
pub fn compete(first: &mut Agent, second: &mut Agent, games: usize) -> Result<CompetitionReport> {
    if first.player() == second.player() {
        return Err(Error::InvalidConfiguration {
            message: format!("both agents play {}", first.player()),
        });
    }

    let first_player = first.player();
    let mut outcomes = OutcomeTally::default();
    for _ in 0..games {
        let episode = play_episode(first, second)?;
        outcomes.record(episode.outcome(), first_player);
    }

    info!(
        games,
        first_win_rate = outcomes.first_win_rate(),
        second_win_rate = outcomes.second_win_rate(),
        draw_rate = outcomes.draw_rate(),
        "competition finished"
    );

    Ok(CompetitionReport {
        games,
        first_player,
        outcomes,
    })
}
