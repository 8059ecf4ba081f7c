//! Tic-Tac-Toe game implementation

pub mod board;
pub mod game;
pub mod game_tree;
pub mod lines;
pub mod optimal;

pub use board::{BOARD_COLS, BOARD_ROWS, BOARD_SIZE, BoardState, Cell, Grid, Player};
pub use game::{DRAW_VALUE, Game, GameOutcome, LOSS_VALUE, Move, WIN_VALUE};
pub use game_tree::{StateGraph, StateNode, enumerate_all};
pub use lines::{LineAnalyzer, WINNING_LINES};
pub use optimal::{Solver, Verdict};
