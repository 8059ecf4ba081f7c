//! Observer implementations for training runs
//!
//! Observers allow composable reporting during training without coupling the
//! trainer to progress bars or log formats.

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{compete::OutcomeTally, training::Episode};
use crate::{Error, Result, pipeline::TrainingReport, ports::Observer, tictactoe::Player};

fn record(tally: &mut OutcomeTally, episode: &Episode) {
    if let Some(first) = episode.first_player() {
        tally.record(episode.outcome(), first);
    }
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    outcomes: OutcomeTally,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            outcomes: OutcomeTally::default(),
        }
    }

    fn message(&self) -> String {
        format!(
            "first {} second {} draw {}",
            self.outcomes.first_wins, self.outcomes.second_wins, self.outcomes.draws
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode_num: usize, episode: &Episode) -> Result<()> {
        record(&mut self.outcomes, episode);
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode_num as u64);
            if episode_num.is_multiple_of(100) {
                pb.set_message(self.message());
            }
        }
        Ok(())
    }

    fn on_training_end(&mut self, _report: &TrainingReport) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Logs cumulative win rates every `interval` episodes.
pub struct LoggingObserver {
    interval: usize,
    outcomes: OutcomeTally,
}

impl LoggingObserver {
    /// An `interval` of 0 disables the periodic lines.
    pub fn new(interval: usize) -> Self {
        Self {
            interval,
            outcomes: OutcomeTally::default(),
        }
    }
}

impl Observer for LoggingObserver {
    fn on_episode_end(&mut self, episode_num: usize, episode: &Episode) -> Result<()> {
        record(&mut self.outcomes, episode);
        if self.interval > 0 && episode_num.is_multiple_of(self.interval) {
            info!(
                episode = episode_num,
                first_win_rate = self.outcomes.first_win_rate(),
                second_win_rate = self.outcomes.second_win_rate(),
                draw_rate = self.outcomes.draw_rate(),
                "training progress"
            );
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    outcomes: OutcomeTally,
    episodes: usize,
    total_moves: usize,
    exploratory_moves: usize,
    first_player: Option<Player>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get average game length
    pub fn avg_game_length(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_moves as f64 / self.episodes as f64
        }
    }

    /// Share of moves that came from the exploration branch
    pub fn exploration_rate(&self) -> f64 {
        if self.total_moves == 0 {
            0.0
        } else {
            self.exploratory_moves as f64 / self.total_moves as f64
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes,
            first_player: self.first_player,
            outcomes: self.outcomes,
            avg_game_length: self.avg_game_length(),
            exploration_rate: self.exploration_rate(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub first_player: Option<Player>,
    #[serde(flatten)]
    pub outcomes: OutcomeTally,
    pub avg_game_length: f64,
    pub exploration_rate: f64,
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, _episode_num: usize, episode: &Episode) -> Result<()> {
        self.episodes += 1;
        self.total_moves += episode.game.moves().len();
        self.exploratory_moves += episode.exploratory_moves();
        self.first_player = self.first_player.or(episode.first_player());
        record(&mut self.outcomes, episode);
        Ok(())
    }
}
