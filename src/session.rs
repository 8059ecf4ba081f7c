//! A single interactive game between a human and the trained agents
//!
//! The session holds one agent per seat: the X agent answers when the AI
//! opens, the O agent when the human does. Each call returns a
//! [`TurnReport`] describing the board after the AI has replied.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    agent::Agent,
    tictactoe::{BoardState, Grid, Player},
};

/// Policy file of the agent that moves first.
pub const FIRST_POLICY_FILE: &str = "policy_first.bin";
/// Policy file of the agent that moves second.
pub const SECOND_POLICY_FILE: &str = "policy_second.bin";
/// Exploration rate of an agent whose policy could not be loaded.
pub const FALLBACK_EPSILON: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// Board and status after a session call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReport {
    pub board: Grid,
    pub game_over: bool,
    /// 1 or -1 for the winning symbol, 0 for a draw
    pub winner: Option<i8>,
    pub human_goes_first: bool,
    pub ai_move: Option<Position>,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    ai_first: Agent,
    ai_second: Agent,
    state: BoardState,
    human_goes_first: bool,
}

impl GameSession {
    /// Start a session where the human opens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `ai_first` plays X and
    /// `ai_second` plays O.
    pub fn new(ai_first: Agent, ai_second: Agent) -> Result<Self> {
        if ai_first.player() != Player::X || ai_second.player() != Player::O {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "session agents must play X then O, got {} and {}",
                    ai_first.player(),
                    ai_second.player()
                ),
            });
        }
        Ok(Self {
            ai_first,
            ai_second,
            state: BoardState::new(),
            human_goes_first: true,
        })
    }

    /// Greedy agents loaded from `policy_dir`.
    ///
    /// A missing or unreadable policy leaves that agent untrained with
    /// [`FALLBACK_EPSILON`].
    pub fn load<P: AsRef<Path>>(policy_dir: P) -> Result<Self> {
        let dir = policy_dir.as_ref();
        let mut ai_first = Agent::new(Player::X, 0.0)?;
        let mut ai_second = Agent::new(Player::O, 0.0)?;

        let first_loaded =
            ai_first.load_policy_or_fallback(dir.join(FIRST_POLICY_FILE), FALLBACK_EPSILON);
        let second_loaded =
            ai_second.load_policy_or_fallback(dir.join(SECOND_POLICY_FILE), FALLBACK_EPSILON);
        info!(
            dir = %dir.display(),
            first_loaded,
            second_loaded,
            "game session ready"
        );

        Self::new(ai_first, ai_second)
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn human_goes_first(&self) -> bool {
        self.human_goes_first
    }

    pub fn human_player(&self) -> Player {
        if self.human_goes_first {
            Player::X
        } else {
            Player::O
        }
    }

    pub fn report(&self) -> TurnReport {
        self.report_with(None)
    }

    /// Start a new game with the other side opening.
    ///
    /// When the AI opens, its first move is already on the returned board.
    pub fn reset(&mut self) -> Result<TurnReport> {
        self.human_goes_first = !self.human_goes_first;
        self.state = BoardState::new();
        debug!(human_goes_first = self.human_goes_first, "session reset");

        if self.human_goes_first {
            return Ok(self.report_with(None));
        }
        let ai_move = self.ai_turn()?;
        Ok(self.report_with(Some(ai_move)))
    }

    /// Apply the human move at (`row`, `col`), then the AI reply unless the
    /// game has ended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GameOver`] once the game has ended and
    /// [`Error::InvalidMove`] for an occupied or out-of-range cell; the board
    /// is left unchanged in both cases.
    pub fn play(&mut self, row: usize, col: usize) -> Result<TurnReport> {
        if self.state.is_terminal() {
            return Err(Error::GameOver);
        }

        self.state = self.state.next_state(row, col, self.human_player())?;
        debug!(row, col, player = %self.human_player(), "human move");
        if self.state.is_terminal() {
            self.log_result();
            return Ok(self.report_with(None));
        }

        let ai_move = self.ai_turn()?;
        if self.state.is_terminal() {
            self.log_result();
        }
        Ok(self.report_with(Some(ai_move)))
    }

    fn ai_turn(&mut self) -> Result<Position> {
        let agent = if self.human_goes_first {
            &mut self.ai_second
        } else {
            &mut self.ai_first
        };
        agent.set_state(self.state);
        let mv = agent.act()?;
        self.state = mv.apply(&self.state)?;
        debug!(row = mv.row, col = mv.col, player = %mv.player, "ai move");
        Ok(Position {
            row: mv.row,
            col: mv.col,
        })
    }

    fn log_result(&self) {
        info!(
            winner = ?self.state.winner(),
            human = %self.human_player(),
            "game finished"
        );
    }

    fn report_with(&self, ai_move: Option<Position>) -> TurnReport {
        let outcome = self.state.outcome();
        TurnReport {
            board: self.state.grid(),
            game_over: outcome.is_terminal(),
            winner: outcome.winner_symbol(),
            human_goes_first: self.human_goes_first,
            ai_move,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoveRejection;

    fn greedy_session() -> GameSession {
        GameSession::new(
            Agent::new(Player::X, 0.0).unwrap(),
            Agent::new(Player::O, 0.0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn human_opens_by_default() {
        let session = greedy_session();
        let report = session.report();
        assert!(report.human_goes_first);
        assert!(!report.game_over);
        assert_eq!(report.board, [[0; 3]; 3]);
    }

    #[test]
    fn play_applies_human_then_ai_move() {
        let mut session = greedy_session();
        let report = session.play(1, 1).unwrap();
        assert_eq!(report.board[1][1], 1);
        assert_eq!(report.ai_move, Some(Position { row: 0, col: 0 }));
        assert_eq!(report.board[0][0], -1);
    }

    #[test]
    fn reset_toggles_first_player_and_ai_opens() {
        let mut session = greedy_session();
        let report = session.reset().unwrap();
        assert!(!report.human_goes_first);
        let ai_move = report.ai_move.unwrap();
        assert_eq!(report.board[ai_move.row][ai_move.col], 1);
        assert_eq!(session.human_player(), Player::O);

        let report = session.reset().unwrap();
        assert!(report.human_goes_first);
        assert_eq!(report.ai_move, None);
        assert_eq!(report.board, [[0; 3]; 3]);
    }

    #[test]
    fn occupied_cell_is_rejected_without_changes() {
        let mut session = greedy_session();
        session.play(1, 1).unwrap();
        let before = *session.state();

        let err = session.play(0, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidMove {
                reason: MoveRejection::Occupied,
                ..
            }
        ));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn finished_game_rejects_moves() {
        let mut session = greedy_session();
        let mut report = session.play(2, 2).unwrap();
        while !report.game_over {
            let (row, col) = session.state().legal_moves()[0];
            report = session.play(row, col).unwrap();
        }
        assert!(report.winner.is_some());
        assert!(matches!(session.play(0, 0), Err(Error::GameOver)));
    }

    #[test]
    fn report_uses_camel_case_keys() {
        let json = serde_json::to_value(greedy_session().report()).unwrap();
        assert!(json.get("gameOver").is_some());
        assert!(json.get("humanGoesFirst").is_some());
        assert!(json.get("aiMove").is_some());
    }

    #[test]
    fn rejects_swapped_seats() {
        let result = GameSession::new(
            Agent::new(Player::O, 0.0).unwrap(),
            Agent::new(Player::X, 0.0).unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn load_falls_back_when_files_are_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut session = GameSession::load(dir.path()).unwrap();
        let report = session.play(1, 1).unwrap();
        assert!(report.ai_move.is_some());
    }
}
