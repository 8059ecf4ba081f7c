//! Outcomes, moves and game records

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{BoardState, Player};

/// Value of a finished game for the winner, a draw, and the loser.
pub const WIN_VALUE: f64 = 1.0;
pub const DRAW_VALUE: f64 = 0.5;
pub const LOSS_VALUE: f64 = 0.0;

/// Outcome of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    InProgress,
    Win(Player),
    Draw,
}

impl GameOutcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::Win(player) => Some(player),
            _ => None,
        }
    }

    /// Fixed value of a terminal outcome from `player`'s perspective.
    ///
    /// Returns `None` while the game is still in progress.
    pub fn terminal_value(self, player: Player) -> Option<f64> {
        match self {
            GameOutcome::InProgress => None,
            GameOutcome::Draw => Some(DRAW_VALUE),
            GameOutcome::Win(winner) if winner == player => Some(WIN_VALUE),
            GameOutcome::Win(_) => Some(LOSS_VALUE),
        }
    }

    /// Winner symbol as reported to callers: 1 / -1 for a win, 0 for a draw.
    pub fn winner_symbol(self) -> Option<i8> {
        match self {
            GameOutcome::InProgress => None,
            GameOutcome::Draw => Some(0),
            GameOutcome::Win(player) => Some(player.symbol()),
        }
    }
}

/// A move in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
    pub player: Player,
}

impl Move {
    pub fn new(row: usize, col: usize, player: Player) -> Self {
        Self { row, col, player }
    }

    /// Apply this move to a board.
    pub fn apply(&self, state: &BoardState) -> crate::Result<BoardState> {
        state.next_state(self.row, self.col, self.player)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> ({}, {})", self.player, self.row, self.col)
    }
}

/// A complete game with history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    states: Vec<BoardState>,
    moves: Vec<Move>,
}

impl Game {
    /// Create a new game from the empty board
    pub fn new() -> Self {
        Game {
            states: vec![BoardState::new()],
            moves: Vec::new(),
        }
    }

    /// Play a move and return the resulting outcome.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::GameOver`] once the game has ended, or
    /// [`crate::Error::InvalidMove`] for an illegal cell.
    pub fn play(&mut self, mv: Move) -> crate::Result<GameOutcome> {
        let current = self.current_state();
        if current.is_terminal() {
            return Err(crate::Error::GameOver);
        }

        let next = mv.apply(&current)?;
        self.states.push(next);
        self.moves.push(mv);
        Ok(next.outcome())
    }

    /// Get current board state
    pub fn current_state(&self) -> BoardState {
        self.states[self.states.len() - 1]
    }

    /// Every position of the game, starting with the empty board.
    pub fn states(&self) -> &[BoardState] {
        &self.states
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn outcome(&self) -> GameOutcome {
        self.current_state().outcome()
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_terminal()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
