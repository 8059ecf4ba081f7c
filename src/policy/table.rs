//! State-value table for temporal difference learning

use std::collections::BTreeMap;

use crate::{
    Error, Result,
    identifiers::StateHash,
    tictactoe::{BoardState, Player, StateGraph},
};

/// Value assumed for any non-terminal state the table has no entry for.
pub const DEFAULT_VALUE: f64 = 0.5;

/// Estimated probability of winning from each state, for one player.
///
/// Entries are ordered by hash so iteration and serialization are
/// reproducible. Terminal states act as fixed anchors: their value is the
/// outcome for the owner (1.0 win, 0.5 draw, 0.0 loss) whether or not the
/// table holds an entry for them.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyTable {
    player: Player,
    values: BTreeMap<StateHash, f64>,
}

impl PolicyTable {
    /// Create an empty table; every lookup falls back to the defaults.
    pub fn new(player: Player) -> Self {
        Self {
            player,
            values: BTreeMap::new(),
        }
    }

    /// Create a table with an entry for every state in `graph`.
    ///
    /// Terminal states get their outcome value for `player`; all others 0.5.
    pub fn initialize(player: Player, graph: &StateGraph) -> Self {
        let values = graph
            .iter()
            .map(|node| {
                let value = node
                    .outcome()
                    .terminal_value(player)
                    .unwrap_or(DEFAULT_VALUE);
                (node.state.hash_key(), value)
            })
            .collect();
        Self { player, values }
    }

    /// Table initialized over the standard X-first state graph.
    pub fn untrained(player: Player) -> Self {
        Self::initialize(player, StateGraph::standard())
    }

    /// Rebuild a table from persisted entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPolicyValue`] for values that are not finite or
    /// fall outside `[0, 1]`.
    pub fn from_entries<I>(player: Player, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (StateHash, f64)>,
    {
        let mut values = BTreeMap::new();
        for (hash, value) in entries {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidPolicyValue { hash, value });
            }
            values.insert(hash, value);
        }
        Ok(Self { player, values })
    }

    /// Player whose perspective the values describe.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Stored entry for a hash, if any.
    pub fn get(&self, hash: StateHash) -> Option<f64> {
        self.values.get(&hash).copied()
    }

    /// Value of a state: the stored entry, else the terminal anchor, else 0.5.
    pub fn value(&self, state: &BoardState) -> f64 {
        self.get(state.hash_key()).unwrap_or_else(|| {
            state
                .outcome()
                .terminal_value(self.player)
                .unwrap_or(DEFAULT_VALUE)
        })
    }

    /// TD(0) update of `state` toward `next`:
    ///
    /// V(s) ← V(s) + α[V(s') − V(s)]
    ///
    /// Terminal states are anchors and are never moved. Returns the new value.
    pub(crate) fn td_update(
        &mut self,
        state: &BoardState,
        next: &BoardState,
        learning_rate: f64,
    ) -> f64 {
        let current = self.value(state);
        if state.is_terminal() {
            return current;
        }
        let target = self.value(next);
        let updated = current + learning_rate * (target - current);
        self.values.insert(state.hash_key(), updated);
        updated
    }

    /// Entries in ascending hash order.
    pub fn iter(&self) -> impl Iterator<Item = (StateHash, f64)> + '_ {
        self.values.iter().map(|(&hash, &value)| (hash, value))
    }

    /// Get total number of stored values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
