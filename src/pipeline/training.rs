//! Self-play training with temporal-difference backups

use std::{fs::File, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::compete::OutcomeTally;
use crate::{
    Error, Result,
    agent::Agent,
    app::TrainingConfig,
    ports::Observer,
    tictactoe::{BoardState, Game, GameOutcome, Player},
};

/// One finished self-play game
#[derive(Debug, Clone)]
pub struct Episode {
    pub game: Game,
    /// Whether each move of `game` was exploratory, in move order
    pub explored: Vec<bool>,
}

impl Episode {
    pub fn outcome(&self) -> GameOutcome {
        self.game.outcome()
    }

    pub fn first_player(&self) -> Option<Player> {
        self.game.moves().first().map(|mv| mv.player)
    }

    pub fn exploratory_moves(&self) -> usize {
        self.explored.iter().filter(|&&explored| explored).count()
    }

    /// Positions produced by `player`'s own moves, paired with whether the
    /// move was exploratory.
    ///
    /// When the opponent made the last move the terminal position is
    /// appended, flagged as not exploratory.
    pub fn own_trajectory(&self, player: Player) -> Vec<(BoardState, bool)> {
        let states = self.game.states();
        let mut trajectory: Vec<(BoardState, bool)> = self
            .game
            .moves()
            .iter()
            .zip(&self.explored)
            .enumerate()
            .filter(|(_, (mv, _))| mv.player == player)
            .map(|(index, (_, &explored))| (states[index + 1], explored))
            .collect();

        let last_mover = self.game.moves().last().map(|mv| mv.player);
        if self.game.is_over() && last_mover.is_some_and(|mover| mover != player) {
            trajectory.push((self.game.current_state(), false));
        }
        trajectory
    }
}

/// Play one game from the empty board, `first` opening; no learning.
pub fn play_episode(first: &mut Agent, second: &mut Agent) -> Result<Episode> {
    let mut game = Game::new();
    let mut explored = Vec::new();

    while !game.is_over() {
        let agent = if game.moves().len().is_multiple_of(2) {
            &mut *first
        } else {
            &mut *second
        };
        agent.set_state(game.current_state());
        let decision = agent.decide()?;
        game.play(decision.mv)?;
        explored.push(decision.explored);
    }

    Ok(Episode { game, explored })
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Episodes played
    pub episodes: usize,

    /// Symbol of the agent that opened every episode
    pub first_player: Player,

    pub learning_rate: f64,

    pub seed: Option<u64>,

    #[serde(flatten)]
    pub outcomes: OutcomeTally,

    pub first_win_rate: f64,
    pub second_win_rate: f64,
    pub draw_rate: f64,
}

impl TrainingReport {
    pub fn new(config: &TrainingConfig, first_player: Player, outcomes: OutcomeTally) -> Self {
        Self {
            episodes: outcomes.total(),
            first_player,
            learning_rate: config.learning_rate,
            seed: config.seed,
            outcomes,
            first_win_rate: outcomes.first_win_rate(),
            second_win_rate: outcomes.second_win_rate(),
            draw_rate: outcomes.draw_rate(),
        }
    }

    /// Save report to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load report from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open {}", path.display()),
            source,
        })?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// Self-play trainer for a pair of agents
///
/// # Examples
///
/// ```
/// use td_tictactoe::{
///     agent::Agent,
///     app::TrainingConfig,
///     pipeline::Trainer,
///     tictactoe::Player,
/// };
///
/// let config = TrainingConfig {
///     episodes: 50,
///     seed: Some(3),
///     ..TrainingConfig::default()
/// };
/// let (first, second) = config.agent_configs();
/// let mut first = Agent::from_config(&first)?;
/// let mut second = Agent::from_config(&second)?;
///
/// let report = Trainer::new(config)?.train(&mut first, &mut second)?;
/// assert_eq!(report.episodes, 50);
/// assert_eq!(report.first_player, Player::X);
/// # Ok::<(), td_tictactoe::Error>(())
/// ```
pub struct Trainer<'a> {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer + 'a>>,
}

impl<'a> Trainer<'a> {
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            observers: Vec::new(),
        })
    }

    /// Add an observer to the trainer
    pub fn with_observer(mut self, observer: Box<dyn Observer + 'a>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run `episodes` games with `first` opening each one, backing up both
    /// tables after every game.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when both agents play the same
    /// symbol, or the first observer error.
    pub fn train(&mut self, first: &mut Agent, second: &mut Agent) -> Result<TrainingReport> {
        if first.player() == second.player() {
            return Err(Error::InvalidConfiguration {
                message: format!("both agents play {}", first.player()),
            });
        }

        let episodes = self.config.episodes;
        let first_player = first.player();
        info!(
            episodes,
            learning_rate = self.config.learning_rate,
            first_epsilon = first.epsilon(),
            second_epsilon = second.epsilon(),
            first_player = %first_player,
            "starting self-play training"
        );

        for observer in &mut self.observers {
            observer.on_training_start(episodes)?;
        }

        let mut outcomes = OutcomeTally::default();
        for episode_num in 1..=episodes {
            let episode = play_episode(first, second)?;
            self.back_up(first, &episode);
            self.back_up(second, &episode);
            outcomes.record(episode.outcome(), first_player);

            for observer in &mut self.observers {
                observer.on_episode_end(episode_num, &episode)?;
            }
        }

        for agent in [&mut *first, &mut *second] {
            let metadata = agent.metadata_mut();
            metadata.episodes += episodes;
            metadata.learning_rate = Some(self.config.learning_rate);
            metadata.seed = self.config.seed;
        }

        let report = TrainingReport::new(&self.config, first_player, outcomes);
        for observer in &mut self.observers {
            observer.on_training_end(&report)?;
        }

        info!(
            episodes,
            first_wins = outcomes.first_wins,
            second_wins = outcomes.second_wins,
            draws = outcomes.draws,
            "training finished"
        );
        Ok(report)
    }

    /// Backward pass over the agent's own trajectory.
    fn back_up(&self, agent: &mut Agent, episode: &Episode) {
        let trajectory = episode.own_trajectory(agent.player());
        let learning_rate = self.config.learning_rate;
        let skip_exploratory = self.config.skip_exploratory_backups;
        let table = agent.policy_mut();

        let mut updates = 0usize;
        for pair in trajectory.windows(2).rev() {
            let (state, _) = pair[0];
            let (next, explored) = pair[1];
            if skip_exploratory && explored {
                continue;
            }
            table.td_update(&state, &next, learning_rate);
            updates += 1;
        }

        debug!(player = %table.player(), updates, "backed up episode");
    }
}

/// Train with default ε and an unseeded run.
///
/// Shorthand for [`Trainer::train`] that only sets the episode count and α.
pub fn train(
    episodes: usize,
    learning_rate: f64,
    first: &mut Agent,
    second: &mut Agent,
) -> Result<TrainingReport> {
    let config = TrainingConfig {
        episodes,
        learning_rate,
        ..TrainingConfig::default()
    };
    Trainer::new(config)?.train(first, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pipeline::MetricsObserver,
        policy::DEFAULT_VALUE,
        tictactoe::{Move, StateGraph},
    };

    fn episode_from(moves: &[(usize, usize)], explored: &[bool]) -> Episode {
        let mut game = Game::new();
        let mut player = Player::X;
        for &(row, col) in moves {
            game.play(Move::new(row, col, player)).unwrap();
            player = player.opponent();
        }
        Episode {
            game,
            explored: explored.to_vec(),
        }
    }

    fn seeded_pair(seed: u64, epsilon: f64) -> (Agent, Agent) {
        let first = Agent::new(Player::X, epsilon).unwrap().with_seed(seed);
        let second = Agent::new(Player::O, epsilon).unwrap().with_seed(seed + 1);
        (first, second)
    }

    #[test]
    fn trajectory_of_winner_ends_on_own_move() {
        // X: (0,0) (0,1) (0,2) wins; O: (1,0) (1,1)
        let episode = episode_from(&[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)], &[false; 5]);
        let states = episode.game.states();

        let x_path = episode.own_trajectory(Player::X);
        assert_eq!(
            x_path.iter().map(|(s, _)| *s).collect::<Vec<_>>(),
            vec![states[1], states[3], states[5]]
        );

        let o_path = episode.own_trajectory(Player::O);
        assert_eq!(
            o_path.iter().map(|(s, _)| *s).collect::<Vec<_>>(),
            vec![states[2], states[4], states[5]]
        );
        assert!(o_path.last().unwrap().0.is_terminal());
    }

    #[test]
    fn trajectory_keeps_exploration_flags() {
        let episode = episode_from(&[(0, 0), (1, 0), (0, 1)], &[false, true, true]);
        let flags: Vec<bool> = episode
            .own_trajectory(Player::X)
            .iter()
            .map(|(_, explored)| *explored)
            .collect();
        assert_eq!(flags, vec![false, true]);
        assert_eq!(episode.exploratory_moves(), 2);
        assert_eq!(episode.first_player(), Some(Player::X));
    }

    #[test]
    fn backup_propagates_loss_to_loser() {
        let config = TrainingConfig {
            learning_rate: 0.5,
            ..TrainingConfig::default()
        };
        let trainer = Trainer::new(config).unwrap();
        let episode = episode_from(&[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)], &[false; 5]);
        let mut second = Agent::new(Player::O, 0.0).unwrap();

        trainer.back_up(&mut second, &episode);

        let states = episode.game.states();
        let table = second.policy();
        // s4 moves halfway to the 0.0 anchor, then s2 halfway to s4
        assert_eq!(table.get(states[4].hash_key()), Some(0.25));
        assert_eq!(table.get(states[2].hash_key()), Some(0.375));
        assert_eq!(table.get(states[5].hash_key()), Some(0.0));
    }

    #[test]
    fn exploratory_moves_can_be_skipped() {
        let config = TrainingConfig {
            learning_rate: 0.5,
            skip_exploratory_backups: true,
            ..TrainingConfig::default()
        };
        let trainer = Trainer::new(config).unwrap();
        // X's final winning move was exploratory
        let episode = episode_from(
            &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)],
            &[false, false, false, false, true],
        );
        let mut first = Agent::new(Player::X, 0.0).unwrap();

        trainer.back_up(&mut first, &episode);

        let states = episode.game.states();
        assert_eq!(first.policy().get(states[3].hash_key()), Some(DEFAULT_VALUE));
    }

    #[test]
    fn training_never_moves_terminal_anchors() {
        let config = TrainingConfig {
            episodes: 300,
            seed: Some(11),
            ..TrainingConfig::default()
        };
        let (mut first, mut second) = seeded_pair(11, 0.3);
        Trainer::new(config)
            .unwrap()
            .train(&mut first, &mut second)
            .unwrap();

        for node in StateGraph::standard().terminal_states() {
            let hash = node.state.hash_key();
            let expected = node.outcome().terminal_value(Player::X);
            assert_eq!(first.policy().get(hash), expected);
        }
        assert_eq!(first.metadata().episodes, 300);
        assert_eq!(second.metadata().seed, Some(11));
    }

    #[test]
    fn seeded_training_is_reproducible() {
        let run = || {
            let config = TrainingConfig {
                episodes: 200,
                seed: Some(4),
                ..TrainingConfig::default()
            };
            let (mut first, mut second) = seeded_pair(4, 0.2);
            let report = Trainer::new(config)
                .unwrap()
                .train(&mut first, &mut second)
                .unwrap();
            (report, first.policy().clone(), second.policy().clone())
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn report_and_observers_see_every_episode() {
        let config = TrainingConfig {
            episodes: 40,
            ..TrainingConfig::default()
        };
        let (mut first, mut second) = seeded_pair(2, 0.1);
        let mut metrics = MetricsObserver::new();

        let report = {
            let mut trainer = Trainer::new(config)
                .unwrap()
                .with_observer(Box::new(&mut metrics));
            trainer.train(&mut first, &mut second).unwrap()
        };

        assert_eq!(report.episodes, 40);
        assert_eq!(report.outcomes.total(), 40);
        assert_eq!(metrics.summary().episodes, 40);
        assert_eq!(metrics.summary().outcomes, report.outcomes);
    }

    #[test]
    fn rejects_agents_with_same_symbol() {
        let mut first = Agent::new(Player::O, 0.1).unwrap();
        let mut second = Agent::new(Player::O, 0.1).unwrap();
        assert!(train(10, 0.1, &mut first, &mut second).is_err());
    }

    #[test]
    fn report_round_trips_through_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        let (mut first, mut second) = seeded_pair(8, 0.1);
        let report = train(20, 0.2, &mut first, &mut second).unwrap();

        report.save(&path).unwrap();
        assert_eq!(TrainingReport::load(&path).unwrap(), report);
    }

    #[test]
    fn missing_report_names_the_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.json");

        let err = TrainingReport::load(&path).unwrap_err();
        match err {
            Error::Io { operation, .. } => {
                assert_eq!(operation, format!("open {}", path.display()))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
