//! Tic-Tac-Toe engine with a self-play trained value table
//!
//! This crate provides:
//! - Complete Tic-Tac-Toe game implementation with base-3 state hashing
//! - Exhaustive enumeration of the reachable state graph
//! - Per-player value tables trained by temporal-difference self-play
//! - An ε-greedy agent that plays from a trained table without search
//! - A perfect-play solver, competition and exhaustive evaluation
//! - A single-game session and a command-line front end

pub mod adapters;
pub mod agent;
pub mod app;
pub mod cli;
pub mod error;
pub mod identifiers;
pub mod pipeline;
pub mod policy;
pub mod ports;
pub mod session;
pub mod tictactoe;

pub use agent::{Agent, Decision};
pub use error::{Error, MoveRejection, Result};
pub use identifiers::StateHash;
pub use policy::PolicyTable;
pub use session::{GameSession, TurnReport};
pub use tictactoe::{BoardState, GameOutcome, Move, Player};
