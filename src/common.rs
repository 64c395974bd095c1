//! Common types for Battleship: coordinates, cell states, shot outcomes and
//! the error enums shared by the board and the game session.

use core::fmt;
use std::time::SystemTime;

use serde::Serialize;

use crate::grid::GridError;

/// A board cell, 0-indexed as (row, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// In-bounds orthogonal neighbours, in the order up, down, left, right.
    pub fn neighbors(self, size: usize) -> impl Iterator<Item = Coordinate> {
        const STEPS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        STEPS
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc, size))
    }

    /// In-bounds cells of the surrounding 3×3 block, excluding `self`.
    pub fn surrounding(self, size: usize) -> impl Iterator<Item = Coordinate> {
        (-1isize..=1)
            .flat_map(|dr| (-1isize..=1).map(move |dc| (dr, dc)))
            .filter(|&(dr, dc)| dr != 0 || dc != 0)
            .filter_map(move |(dr, dc)| self.offset(dr, dc, size))
    }

    /// Cell displaced by (`dr`, `dc`), or `None` if it leaves the board.
    pub fn offset(self, dr: isize, dc: isize, size: usize) -> Option<Coordinate> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        (row < size && col < size).then_some(Coordinate::new(row, col))
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((row, col): (usize, usize)) -> Self {
        Coordinate::new(row, col)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// State of a single cell.
///
/// `Ship` only ever appears on the owner's side of a board; the attacker's
/// projection reports it as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CellState {
    Unknown,
    Ship,
    Hit,
    Miss,
}

/// The two participants of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Ai => write!(f, "ai"),
        }
    }
}

/// Result of a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShotOutcome {
    /// Shot missed all ships.
    Miss,
    /// Shot hit a ship that is still afloat.
    Hit,
    /// Shot sank a ship, carrying its name.
    Sunk(&'static str),
    /// Shot sank the last ship of the fleet.
    AllSunk(&'static str),
}

impl ShotOutcome {
    /// Returns `true` if the shot struck a ship.
    pub fn is_hit(&self) -> bool {
        !matches!(self, ShotOutcome::Miss)
    }

    /// Name of the ship this shot sank, if any.
    pub fn sunk_ship(&self) -> Option<&'static str> {
        match self {
            ShotOutcome::Sunk(name) | ShotOutcome::AllSunk(name) => Some(*name),
            _ => None,
        }
    }
}

/// One entry of a board's shot log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShotRecord {
    /// Position in the log, starting at 0.
    pub seq: usize,
    pub coord: Coordinate,
    pub outcome: ShotOutcome,
    pub at: SystemTime,
}

/// Errors raised while placing ships.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("ship cell {0} is outside the board")]
    OutOfBounds(Coordinate),
    #[error("ship cell {0} overlaps another ship")]
    Overlaps(Coordinate),
    #[error("ship cell {0} touches another ship")]
    Touches(Coordinate),
    #[error("ship cells must form a straight contiguous line")]
    NotContiguous,
    #[error("{name} needs {expected} cells, got {found}")]
    WrongLength {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("ship length {0} is not supported")]
    InvalidLength(usize),
    #[error("unable to place {name} after {attempts} attempts")]
    UnableToPlace { name: &'static str, attempts: usize },
}

/// Errors raised by shot application. The board is unchanged when one is
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShotError {
    #[error("coordinate {0} is outside the board")]
    OutOfBounds(Coordinate),
    #[error("cell {0} was already fired upon")]
    DuplicateShot(Coordinate),
}

impl From<GridError> for ShotError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::IndexOutOfBounds { row, col, .. } => {
                ShotError::OutOfBounds(Coordinate::new(row, col))
            }
        }
    }
}

impl From<GridError> for PlacementError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::IndexOutOfBounds { row, col, .. } => {
                PlacementError::OutOfBounds(Coordinate::new(row, col))
            }
        }
    }
}
