//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{game::GameOutcome, lines::LineAnalyzer};
use crate::{
    error::{Error, MoveRejection, Result},
    identifiers::StateHash,
};

pub const BOARD_ROWS: usize = 3;
pub const BOARD_COLS: usize = 3;
pub const BOARD_SIZE: usize = BOARD_ROWS * BOARD_COLS;

/// The board as a 3x3 array of symbols (1 = X, -1 = O, 0 = empty).
pub type Grid = [[i8; BOARD_COLS]; BOARD_ROWS];

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    /// Symbol used in the serialized grid.
    pub fn symbol(self) -> i8 {
        match self {
            Cell::Empty => 0,
            Cell::X => 1,
            Cell::O => -1,
        }
    }

    pub fn from_symbol(value: i8) -> Option<Cell> {
        match value {
            0 => Some(Cell::Empty),
            1 => Some(Cell::X),
            -1 => Some(Cell::O),
            _ => None,
        }
    }

    /// Base-3 digit used by the state hash.
    fn digit(self) -> u32 {
        (self.symbol() + 1) as u32
    }

    fn from_digit(digit: u32) -> Cell {
        match digit {
            0 => Cell::O,
            1 => Cell::Empty,
            _ => Cell::X,
        }
    }
}

/// A player in the game
///
/// X always carries symbol `1` and O symbol `-1`. Either may open a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    pub fn symbol(self) -> i8 {
        self.to_cell().symbol()
    }

    /// Parse a player from its grid symbol.
    pub fn from_symbol(value: i8) -> Result<Player> {
        match value {
            1 => Ok(Player::X),
            -1 => Ok(Player::O),
            _ => Err(Error::InvalidSymbol { value }),
        }
    }
}

impl TryFrom<i8> for Player {
    type Error = Error;

    fn try_from(value: i8) -> Result<Self> {
        Player::from_symbol(value)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// Immutable snapshot of the 3x3 grid.
///
/// The outcome is evaluated once when the value is built, so
/// [`BoardState::outcome`] is a field read. The type is `Copy`; the only way to
/// derive a new position is [`BoardState::next_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Grid", try_from = "Grid")]
pub struct BoardState {
    cells: [Cell; BOARD_SIZE],
    outcome: GameOutcome,
}

impl BoardState {
    /// Create a new empty board
    pub fn new() -> Self {
        Self::from_cells([Cell::Empty; BOARD_SIZE])
    }

    fn from_cells(cells: [Cell; BOARD_SIZE]) -> Self {
        let outcome = LineAnalyzer::outcome(&cells);
        BoardState { cells, outcome }
    }

    /// Build a board from a grid of symbols.
    ///
    /// Any combination of symbols is accepted; legality of the position
    /// (piece counts, lines completed after a win) is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCellValue`] for values other than -1, 0 and 1.
    pub fn from_grid(grid: Grid) -> Result<Self> {
        let mut cells = [Cell::Empty; BOARD_SIZE];
        for (row, values) in grid.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                cells[row * BOARD_COLS + col] =
                    Cell::from_symbol(value).ok_or(Error::InvalidCellValue { value, row, col })?;
            }
        }
        Ok(Self::from_cells(cells))
    }

    /// Rebuild the board encoded by a hash.
    pub fn from_hash(hash: StateHash) -> Self {
        let mut remaining = hash.value();
        let mut cells = [Cell::Empty; BOARD_SIZE];
        for cell in cells.iter_mut().rev() {
            *cell = Cell::from_digit(remaining % 3);
            remaining /= 3;
        }
        Self::from_cells(cells)
    }

    /// The grid as symbols, suitable for rendering or serialization.
    pub fn grid(&self) -> Grid {
        let mut grid = [[0; BOARD_COLS]; BOARD_ROWS];
        for (idx, cell) in self.cells.iter().enumerate() {
            grid[idx / BOARD_COLS][idx % BOARD_COLS] = cell.symbol();
        }
        grid
    }

    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    /// Get the cell at `(row, col)`, or `None` when out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row < BOARD_ROWS && col < BOARD_COLS {
            Some(self.cells[row * BOARD_COLS + col])
        } else {
            None
        }
    }

    /// Return the position after `player` claims `(row, col)`.
    ///
    /// The receiver is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMove`] if the coordinates are off the board or
    /// the cell is already occupied.
    ///
    /// # Examples
    ///
    /// ```
    /// use td_tictactoe::tictactoe::{BoardState, Player};
    ///
    /// let empty = BoardState::new();
    /// let next = empty.next_state(1, 1, Player::X).unwrap();
    /// assert_eq!(next.grid()[1][1], 1);
    /// assert_eq!(empty.grid()[1][1], 0);
    /// assert!(next.next_state(1, 1, Player::O).is_err());
    /// ```
    pub fn next_state(&self, row: usize, col: usize, player: Player) -> Result<BoardState> {
        let reject = |reason| Error::InvalidMove { row, col, reason };
        match self.cell(row, col) {
            None => Err(reject(MoveRejection::OutOfBounds)),
            Some(Cell::Empty) => {
                let mut cells = self.cells;
                cells[row * BOARD_COLS + col] = player.to_cell();
                Ok(Self::from_cells(cells))
            }
            Some(_) => Err(reject(MoveRejection::Occupied)),
        }
    }

    /// Base-3 key of the grid.
    pub fn hash_key(&self) -> StateHash {
        let value = self
            .cells
            .iter()
            .fold(0u32, |acc, cell| acc * 3 + cell.digit());
        StateHash::from_raw(value)
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn winner(&self) -> Option<Player> {
        self.outcome.winner()
    }

    /// Empty cells in row-major order.
    pub fn legal_moves(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Empty)
            .map(|(idx, _)| (idx / BOARD_COLS, idx % BOARD_COLS))
            .collect()
    }

    /// Count the number of occupied cells on the board.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    pub fn is_full(&self) -> bool {
        self.occupied_count() == BOARD_SIZE
    }

    /// Whose turn it is, given which player opened the game.
    pub fn player_to_move(&self, first_player: Player) -> Player {
        if self.occupied_count().is_multiple_of(2) {
            first_player
        } else {
            first_player.opponent()
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BoardState> for Grid {
    fn from(state: BoardState) -> Self {
        state.grid()
    }
}

impl TryFrom<Grid> for BoardState {
    type Error = Error;

    fn try_from(grid: Grid) -> Result<Self> {
        BoardState::from_grid(grid)
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "-------------";
        writeln!(f, "{separator}")?;
        for row in self.cells.chunks(BOARD_COLS) {
            write!(f, "|")?;
            for cell in row {
                write!(f, " {} |", cell.to_char())?;
            }
            writeln!(f)?;
            writeln!(f, "{separator}")?;
        }
        Ok(())
    }
}
