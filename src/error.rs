//! Error types for the td_tictactoe crate

use std::{fmt, path::PathBuf};

use thiserror::Error;

use crate::identifiers::StateHash;

/// Why a move was rejected by [`BoardState::next_state`](crate::tictactoe::BoardState::next_state)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    Occupied,
    OutOfBounds,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejection::Occupied => write!(f, "cell is already occupied"),
            MoveRejection::OutOfBounds => write!(f, "coordinates are outside the 3x3 grid"),
        }
    }
}

/// Main error type for the td_tictactoe crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move at ({row}, {col}): {reason}")]
    InvalidMove {
        row: usize,
        col: usize,
        reason: MoveRejection,
    },

    #[error("game already over")]
    GameOver,

    #[error("no valid moves available")]
    NoValidMoves,

    #[error("invalid cell value {value} at ({row}, {col}) (expected -1, 0 or 1)")]
    InvalidCellValue { value: i8, row: usize, col: usize },

    #[error("invalid symbol {value} (expected 1 or -1)")]
    InvalidSymbol { value: i8 },

    #[error("state hash {hash} is out of range (must be below {limit})")]
    InvalidStateHash { hash: u32, limit: u32 },

    #[error("policy value {value} for state {hash} must be finite and within [0, 1]")]
    InvalidPolicyValue { hash: StateHash, value: f64 },

    #[error("policy file not found at {}: {source}", path.display())]
    PolicyNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed policy file {}: {message}", path.display())]
    MalformedPolicyFile { path: PathBuf, message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

impl Error {
    /// Whether this error came from reading a persisted policy.
    ///
    /// Callers recover from these by falling back to an untrained table.
    pub fn is_policy_load_failure(&self) -> bool {
        matches!(
            self,
            Error::PolicyNotFound { .. } | Error::MalformedPolicyFile { .. }
        )
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
