//! Exhaustive evaluation of a greedy agent over the whole game tree
//!
//! Instead of sampling games, the agent's greedy choice is followed at each of
//! its turns while every opponent reply (or every minimax-optimal reply) is
//! branched on. The tally counts leaves of that tree, so a single lost leaf
//! means some line of play beats the agent.

use serde::{Deserialize, Serialize};

use super::compete::OutcomeTally;
use crate::{
    Result,
    agent::Agent,
    tictactoe::{BoardState, Player, Solver},
};

/// Which opponent replies to branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Replies {
    /// Every legal reply
    All,
    /// Only replies that keep the game-theoretic value
    Optimal,
}

/// Leaf counts of an exhaustive evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub agent: Player,
    pub first_player: Player,
    pub replies: Replies,
    pub outcomes: OutcomeTally,
}

impl Evaluation {
    fn agent_moves_first(&self) -> bool {
        self.agent == self.first_player
    }

    pub fn wins(&self) -> usize {
        if self.agent_moves_first() {
            self.outcomes.first_wins
        } else {
            self.outcomes.second_wins
        }
    }

    pub fn losses(&self) -> usize {
        if self.agent_moves_first() {
            self.outcomes.second_wins
        } else {
            self.outcomes.first_wins
        }
    }

    pub fn draws(&self) -> usize {
        self.outcomes.draws
    }

    pub fn never_loses(&self) -> bool {
        self.losses() == 0
    }
}

/// Play `agent` greedily against every reply selected by `replies`.
///
/// `first_player` decides who opens; the agent's ε and working state are
/// not used.
pub fn exhaustive_outcomes(
    agent: &Agent,
    first_player: Player,
    replies: Replies,
) -> Result<Evaluation> {
    let mut walker = Walker {
        agent,
        replies,
        first_player,
        solver: Solver::new(),
        outcomes: OutcomeTally::default(),
    };
    walker.visit(BoardState::new(), first_player)?;

    Ok(Evaluation {
        agent: agent.player(),
        first_player,
        replies,
        outcomes: walker.outcomes,
    })
}

struct Walker<'a> {
    agent: &'a Agent,
    replies: Replies,
    first_player: Player,
    solver: Solver,
    outcomes: OutcomeTally,
}

impl Walker<'_> {
    fn visit(&mut self, state: BoardState, to_move: Player) -> Result<()> {
        if state.is_terminal() {
            self.outcomes.record(state.outcome(), self.first_player);
            return Ok(());
        }

        if to_move == self.agent.player() {
            let mv = self.agent.greedy_move(&state)?;
            return self.visit(mv.apply(&state)?, to_move.opponent());
        }

        let moves = match self.replies {
            Replies::All => state.legal_moves(),
            Replies::Optimal => self.solver.optimal_moves(&state, to_move),
        };
        for (row, col) in moves {
            let next = state.next_state(row, col, to_move)?;
            self.visit(next, to_move.opponent())?;
        }
        Ok(())
    }
}
