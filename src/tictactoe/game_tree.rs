//! Exhaustive enumeration of reachable positions

use std::{collections::HashMap, sync::LazyLock};

use super::{Player, board::BoardState, game::GameOutcome};
use crate::identifiers::StateHash;

static STANDARD_GRAPH: LazyLock<StateGraph> = LazyLock::new(|| enumerate_all(Player::X));

/// A reachable position and the positions one move away from it.
#[derive(Debug, Clone)]
pub struct StateNode {
    pub state: BoardState,
    /// Successor hashes, one per empty cell in row-major order.
    /// Empty for terminal states.
    pub successors: Vec<StateHash>,
}

impl StateNode {
    pub fn outcome(&self) -> GameOutcome {
        self.state.outcome()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Every position reachable from the empty board under legal play.
///
/// Nodes keep the order in which the depth-first expansion first reached
/// them, so iteration is identical across runs.
#[derive(Debug, Clone)]
pub struct StateGraph {
    starting_player: Player,
    nodes: Vec<StateNode>,
    index: HashMap<StateHash, usize>,
}

impl StateGraph {
    fn with_root(starting_player: Player) -> Self {
        let root = BoardState::new();
        let mut graph = Self {
            starting_player,
            nodes: Vec::new(),
            index: HashMap::new(),
        };
        graph.insert(root);
        graph
    }

    /// The graph for games opened by X, built once per process.
    pub fn standard() -> &'static StateGraph {
        &STANDARD_GRAPH
    }

    pub fn starting_player(&self) -> Player {
        self.starting_player
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, hash: StateHash) -> bool {
        self.index.contains_key(&hash)
    }

    pub fn get(&self, hash: StateHash) -> Option<&StateNode> {
        self.index.get(&hash).map(|&idx| &self.nodes[idx])
    }

    /// Nodes in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &StateNode> {
        self.nodes.iter()
    }

    pub fn terminal_states(&self) -> impl Iterator<Item = &StateNode> {
        self.nodes.iter().filter(|node| node.is_terminal())
    }

    /// Total number of moves between enumerated positions.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.successors.len()).sum()
    }

    fn insert(&mut self, state: BoardState) -> bool {
        let hash = state.hash_key();
        if self.index.contains_key(&hash) {
            return false;
        }
        self.index.insert(hash, self.nodes.len());
        self.nodes.push(StateNode {
            state,
            successors: Vec::new(),
        });
        true
    }

    fn expand(&mut self, state: BoardState, player: Player) {
        let parent = self.index[&state.hash_key()];

        for (row, col) in state.legal_moves() {
            let Ok(next) = state.next_state(row, col, player) else {
                continue;
            };
            self.nodes[parent].successors.push(next.hash_key());

            if self.insert(next) && !next.is_terminal() {
                self.expand(next, player.opponent());
            }
        }
    }
}

/// Enumerate every position reachable from the empty board with
/// `starting_player` to move.
///
/// Expansion stops at terminal positions, so no position continues play after
/// a completed line. Each position is expanded once even when several move
/// orders reach it.
///
/// # Examples
///
/// ```
/// use td_tictactoe::tictactoe::{Player, enumerate_all};
///
/// let graph = enumerate_all(Player::X);
/// assert_eq!(graph.len(), 5_478);
/// ```
pub fn enumerate_all(starting_player: Player) -> StateGraph {
    let mut graph = StateGraph::with_root(starting_player);
    graph.expand(BoardState::new(), starting_player);
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachable_state_counts_match_expected() {
        let graph = enumerate_all(Player::X);
        assert_eq!(graph.len(), 5_478);
        assert_eq!(graph.edge_count(), 16_167);

        let mut x_wins = 0;
        let mut o_wins = 0;
        let mut draws = 0;
        for node in graph.terminal_states() {
            match node.outcome() {
                GameOutcome::Win(Player::X) => x_wins += 1,
                GameOutcome::Win(Player::O) => o_wins += 1,
                GameOutcome::Draw => draws += 1,
                GameOutcome::InProgress => unreachable!(),
            }
        }
        assert_eq!((x_wins, o_wins, draws), (626, 316, 16));
    }

    #[test]
    fn root_is_first_node() {
        let graph = enumerate_all(Player::O);
        let root = graph.iter().next().unwrap();
        assert_eq!(root.state, BoardState::new());
        assert_eq!(root.successors.len(), 9);
        assert_eq!(graph.starting_player(), Player::O);
    }

    #[test]
    fn standard_graph_is_x_first() {
        let graph = StateGraph::standard();
        assert_eq!(graph.starting_player(), Player::X);
        assert_eq!(graph.len(), 5_478);
    }
}
