//! Observer port - abstraction for watching self-play training
//!
//! Observers receive training events without the trainer knowing how they
//! are reported (progress bars, log lines, counters).

use crate::{
    Result,
    pipeline::{Episode, TrainingReport},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. `on_episode_end(episode_num, episode)` - After each game and its backups
/// 3. `on_training_end(report)` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use td_tictactoe::{
///     pipeline::Episode,
///     ports::Observer,
/// };
///
/// struct MoveCounter {
///     moves: usize,
/// }
///
/// impl Observer for MoveCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode_num: usize,
///         episode: &Episode,
///     ) -> td_tictactoe::Result<()> {
///         self.moves += episode.game.moves().len();
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    /// Called once before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each episode; `episode_num` counts from 1.
    fn on_episode_end(&mut self, _episode_num: usize, _episode: &Episode) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode.
    fn on_training_end(&mut self, _report: &TrainingReport) -> Result<()> {
        Ok(())
    }
}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        (**self).on_training_start(total_episodes)
    }

    fn on_episode_end(&mut self, episode_num: usize, episode: &Episode) -> Result<()> {
        (**self).on_episode_end(episode_num, episode)
    }

    fn on_training_end(&mut self, report: &TrainingReport) -> Result<()> {
        (**self).on_training_end(report)
    }
}
