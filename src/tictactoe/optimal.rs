//! Perfect-play reference solver

use std::collections::HashMap;

use super::{Player, board::BoardState, game::GameOutcome};
use crate::identifiers::StateHash;

/// Game-theoretic value of a position for the player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verdict {
    Loss,
    Draw,
    Win,
}

impl Verdict {
    fn flip(self) -> Verdict {
        match self {
            Verdict::Loss => Verdict::Win,
            Verdict::Draw => Verdict::Draw,
            Verdict::Win => Verdict::Loss,
        }
    }
}

/// Memoized negamax over board hashes.
#[derive(Debug, Default)]
pub struct Solver {
    memo: HashMap<(StateHash, Player), Verdict>,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `state` for `to_move`, assuming both sides play perfectly.
    pub fn verdict(&mut self, state: &BoardState, to_move: Player) -> Verdict {
        match state.outcome() {
            GameOutcome::Win(winner) if winner == to_move => return Verdict::Win,
            GameOutcome::Win(_) => return Verdict::Loss,
            GameOutcome::Draw => return Verdict::Draw,
            GameOutcome::InProgress => {}
        }

        let key = (state.hash_key(), to_move);
        if let Some(&verdict) = self.memo.get(&key) {
            return verdict;
        }

        let mut best = Verdict::Loss;
        for (row, col) in state.legal_moves() {
            let Ok(next) = state.next_state(row, col, to_move) else {
                continue;
            };
            let child = self.verdict(&next, to_move.opponent()).flip();
            if child > best {
                best = child;
            }
            if best == Verdict::Win {
                break;
            }
        }

        self.memo.insert(key, best);
        best
    }

    /// Every move that preserves the best achievable verdict, in row-major order.
    pub fn optimal_moves(&mut self, state: &BoardState, to_move: Player) -> Vec<(usize, usize)> {
        if state.is_terminal() {
            return Vec::new();
        }

        let scored: Vec<((usize, usize), Verdict)> = state
            .legal_moves()
            .into_iter()
            .filter_map(|(row, col)| {
                let next = state.next_state(row, col, to_move).ok()?;
                Some(((row, col), self.verdict(&next, to_move.opponent()).flip()))
            })
            .collect();

        let Some(best) = scored.iter().map(|(_, verdict)| *verdict).max() else {
            return Vec::new();
        };

        scored
            .into_iter()
            .filter(|(_, verdict)| *verdict == best)
            .map(|(mv, _)| mv)
            .collect()
    }
}
