//! ε-greedy agent driven by a policy table
//!
//! An [`Agent`] owns one [`PolicyTable`] and reasons about the position last
//! handed to it through [`Agent::set_state`]. With probability ε it plays a
//! uniformly random legal move; otherwise it plays the move whose resulting
//! position has the highest value, taking the first such move in row-major
//! order on ties.

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    adapters::repository_for,
    app::AgentConfig,
    policy::{PolicyMetadata, PolicyTable, SavedPolicy},
    tictactoe::{BoardState, Move, Player},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// A chosen move and whether it came from the exploration branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub mv: Move,
    pub explored: bool,
}

#[derive(Debug, Clone)]
pub struct Agent {
    player: Player,
    epsilon: f64,
    policy: PolicyTable,
    metadata: PolicyMetadata,
    current_state: BoardState,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl Agent {
    /// Create an agent with an untrained table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when `epsilon` is outside `[0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use td_tictactoe::{agent::Agent, tictactoe::{BoardState, Player}};
    ///
    /// let mut agent = Agent::new(Player::X, 0.0)?;
    /// agent.set_state(BoardState::new());
    /// let mv = agent.act()?;
    /// assert_eq!(mv.player, Player::X);
    /// # Ok::<(), td_tictactoe::Error>(())
    /// ```
    pub fn new(player: Player, epsilon: f64) -> Result<Self> {
        Self::from_config(&AgentConfig::new(player).with_epsilon(epsilon))
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            player: config.player,
            epsilon: config.epsilon,
            policy: PolicyTable::untrained(config.player),
            metadata: PolicyMetadata::default(),
            current_state: BoardState::new(),
            rng: build_rng(config.seed),
            rng_seed: config.seed,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Replace the table with one trained elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the table belongs to the
    /// other player.
    pub fn with_policy(mut self, policy: PolicyTable) -> Result<Self> {
        if policy.player() != self.player {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "policy table belongs to {} but the agent plays {}",
                    policy.player(),
                    self.player
                ),
            });
        }
        self.policy = policy;
        Ok(self)
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        AgentConfig::new(self.player)
            .with_epsilon(epsilon)
            .validate()?;
        self.epsilon = epsilon;
        Ok(())
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub(crate) fn policy_mut(&mut self) -> &mut PolicyTable {
        &mut self.policy
    }

    pub fn metadata(&self) -> &PolicyMetadata {
        &self.metadata
    }

    pub(crate) fn metadata_mut(&mut self) -> &mut PolicyMetadata {
        &mut self.metadata
    }

    /// Set the position the next [`Agent::act`] reasons about.
    pub fn set_state(&mut self, state: BoardState) {
        self.current_state = state;
    }

    pub fn current_state(&self) -> &BoardState {
        &self.current_state
    }

    /// Choose a move for the current state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GameOver`] if the current state is terminal.
    pub fn act(&mut self) -> Result<Move> {
        self.decide().map(|decision| decision.mv)
    }

    /// Choose a move and report whether it was exploratory.
    pub fn decide(&mut self) -> Result<Decision> {
        let state = self.current_state;
        if state.is_terminal() {
            return Err(Error::GameOver);
        }

        if self.epsilon > 0.0 && self.rng.random::<f64>() < self.epsilon {
            let moves = state.legal_moves();
            let &(row, col) = moves.choose(&mut self.rng).ok_or(Error::NoValidMoves)?;
            return Ok(Decision {
                mv: Move::new(row, col, self.player),
                explored: true,
            });
        }

        Ok(Decision {
            mv: self.greedy_move(&state)?,
            explored: false,
        })
    }

    /// Highest-valued move from `state`, first in row-major order on ties.
    ///
    /// Uses neither the RNG nor the current state.
    pub fn greedy_move(&self, state: &BoardState) -> Result<Move> {
        if state.is_terminal() {
            return Err(Error::GameOver);
        }

        let mut best: Option<(Move, f64)> = None;
        for (row, col) in state.legal_moves() {
            let next = state.next_state(row, col, self.player)?;
            let value = self.policy.value(&next);
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((Move::new(row, col, self.player), value));
            }
        }

        best.map(|(mv, _)| mv).ok_or(Error::NoValidMoves)
    }

    /// Write the table to `path` (`.json` as JSON, otherwise MessagePack).
    pub fn save_policy<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let saved = SavedPolicy::from_table(&self.policy, self.metadata.clone());
        repository_for(path).save(&saved, path)?;
        info!(
            player = %self.player,
            entries = saved.entries.len(),
            path = %path.display(),
            "saved policy"
        );
        Ok(())
    }

    /// Replace the table with the one stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PolicyNotFound`] when the file cannot be opened and
    /// [`Error::MalformedPolicyFile`] when its content is invalid or was
    /// trained for the other player.
    pub fn load_policy<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let saved = repository_for(path).load(path)?;

        if saved.player != self.player {
            return Err(Error::MalformedPolicyFile {
                path: path.to_path_buf(),
                message: format!(
                    "policy was trained for {} but the agent plays {}",
                    saved.player, self.player
                ),
            });
        }

        self.policy = saved.to_table(path)?;
        self.metadata = saved.metadata;
        debug!(
            player = %self.player,
            entries = self.policy.len(),
            episodes = self.metadata.episodes,
            path = %path.display(),
            "loaded policy"
        );
        Ok(())
    }

    /// Load `path`, or degrade to an untrained table with `fallback_epsilon`.
    ///
    /// Returns whether the trained policy was loaded.
    pub fn load_policy_or_fallback<P: AsRef<Path>>(
        &mut self,
        path: P,
        fallback_epsilon: f64,
    ) -> bool {
        let path = path.as_ref();
        match self.load_policy(path) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    player = %self.player,
                    path = %path.display(),
                    error = %err,
                    "no usable policy, falling back to untrained play"
                );
                self.reset_policy();
                self.epsilon = fallback_epsilon.clamp(0.0, 1.0);
                false
            }
        }
    }

    /// Discard learned values.
    pub fn reset_policy(&mut self) {
        self.policy = PolicyTable::untrained(self.player);
        self.metadata = PolicyMetadata::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DEFAULT_VALUE;

    fn board(grid: [[i8; 3]; 3]) -> BoardState {
        BoardState::from_grid(grid).unwrap()
    }

    #[test]
    fn rejects_invalid_epsilon() {
        assert!(Agent::new(Player::X, 1.01).is_err());
        assert!(Agent::new(Player::X, -0.5).is_err());
        assert!(Agent::new(Player::X, 1.0).is_ok());
    }

    #[test]
    fn untrained_greedy_agent_opens_top_left() {
        let mut agent = Agent::new(Player::X, 0.0).unwrap();
        agent.set_state(BoardState::new());
        assert_eq!(agent.act().unwrap(), Move::new(0, 0, Player::X));
    }

    #[test]
    fn greedy_prefers_higher_valued_successor() {
        let empty = BoardState::new();
        let corner = empty.next_state(2, 2, Player::X).unwrap();
        let table = PolicyTable::from_entries(Player::X, [(corner.hash_key(), 0.9)]).unwrap();
        let agent = Agent::new(Player::X, 0.0)
            .unwrap()
            .with_policy(table)
            .unwrap();

        assert_eq!(
            agent.greedy_move(&empty).unwrap(),
            Move::new(2, 2, Player::X)
        );
    }

    #[test]
    fn takes_immediate_win() {
        let state = board([[1, 1, 0], [-1, -1, 0], [0, 0, 0]]);
        let agent = Agent::new(Player::X, 0.0).unwrap();
        assert_eq!(agent.greedy_move(&state).unwrap(), Move::new(0, 2, Player::X));
    }

    #[test]
    fn act_on_finished_game_fails() {
        let mut agent = Agent::new(Player::O, 0.0).unwrap();
        agent.set_state(board([[1, 1, 1], [-1, -1, 0], [0, 0, 0]]));
        assert!(matches!(agent.act(), Err(Error::GameOver)));
    }

    #[test]
    fn full_exploration_is_reproducible_with_seed() {
        let state = board([[1, 0, 0], [0, -1, 0], [0, 0, 0]]);
        let run = |seed| {
            let mut agent = Agent::new(Player::X, 1.0).unwrap().with_seed(seed);
            agent.set_state(state);
            (0..20)
                .map(|_| agent.decide().unwrap())
                .collect::<Vec<_>>()
        };

        let first = run(5);
        assert_eq!(first, run(5));
        assert!(first.iter().all(|decision| decision.explored));
        assert!(
            first
                .iter()
                .all(|decision| state.cell(decision.mv.row, decision.mv.col)
                    == Some(crate::tictactoe::Cell::Empty))
        );
    }

    #[test]
    fn act_leaves_policy_untouched() {
        let mut agent = Agent::new(Player::X, 0.3).unwrap().with_seed(9);
        let before = agent.policy().clone();
        agent.set_state(BoardState::new());
        for _ in 0..10 {
            agent.act().unwrap();
        }
        assert_eq!(agent.policy(), &before);
        assert_eq!(agent.current_state(), &BoardState::new());
    }

    #[test]
    fn with_policy_rejects_other_player() {
        let table = PolicyTable::new(Player::O);
        assert!(Agent::new(Player::X, 0.0).unwrap().with_policy(table).is_err());
    }

    #[test]
    fn reset_policy_restores_defaults() {
        let mut agent = Agent::new(Player::X, 0.0).unwrap();
        let hash = BoardState::new().hash_key();
        agent.policy_mut().td_update(
            &BoardState::new(),
            &board([[1, 1, 1], [-1, -1, 0], [0, 0, 0]]),
            0.5,
        );
        assert_ne!(agent.policy().get(hash), Some(DEFAULT_VALUE));

        agent.reset_policy();
        assert_eq!(agent.policy().get(hash), Some(DEFAULT_VALUE));
    }
}
