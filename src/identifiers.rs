//! Identifier types for board positions.
//!
//! A [`StateHash`] is the base-3 key of a 3x3 grid. It indexes both the
//! enumerated state graph and every policy table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of distinct raw 3x3 grids (3^9).
pub const STATE_SPACE_SIZE: u32 = 19_683;

/// Base-3 key of a board position.
///
/// Cells are read row-major with the most significant digit first; each digit
/// is the cell symbol plus one (O = 0, empty = 1, X = 2). The mapping is a
/// bijection between raw grids and `0..STATE_SPACE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct StateHash(u32);

impl StateHash {
    /// Create a hash, rejecting values outside the state space.
    ///
    /// # Examples
    ///
    /// ```
    /// use td_tictactoe::identifiers::StateHash;
    ///
    /// let hash = StateHash::new(9_841).unwrap();
    /// assert_eq!(hash.value(), 9_841);
    /// assert!(StateHash::new(19_683).is_err());
    /// ```
    pub fn new(value: u32) -> Result<Self> {
        if value < STATE_SPACE_SIZE {
            Ok(Self(value))
        } else {
            Err(Error::InvalidStateHash {
                hash: value,
                limit: STATE_SPACE_SIZE,
            })
        }
    }

    /// Wrap a value already known to be in range.
    pub(crate) fn from_raw(value: u32) -> Self {
        debug_assert!(value < STATE_SPACE_SIZE);
        Self(value)
    }

    /// Get the raw integer key.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for StateHash {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<StateHash> for u32 {
    fn from(hash: StateHash) -> Self {
        hash.0
    }
}
