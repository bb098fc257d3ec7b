use core::fmt;
use serde::{Deserialize, Serialize};

use crate::{PatternError, Result};

/// Rows/columns per side of the lock grid.
pub const GRID_SIDE: u8 = 3;

/// Total number of selectable cells.
pub const GRID_CELLS: usize = (GRID_SIDE * GRID_SIDE) as usize;

/// One dot of the 3x3 grid, addressed by `(row, col)` with both in `0..=2`.
///
/// Plain value type: two cells are the same cell iff row and column match.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    row: u8,
    col: u8,
}

impl Cell {
    /// Caller guarantees `row` and `col` are in range.
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn new(row: u8, col: u8) -> Result<Self> {
        if row < GRID_SIDE && col < GRID_SIDE {
            Ok(Self::new_unchecked(row, col))
        } else {
            Err(PatternError::InvalidCell)
        }
    }

    /// Builds a cell from its flattened index `row * 3 + col`.
    pub fn from_index(index: u8) -> Result<Self> {
        if (index as usize) < GRID_CELLS {
            Ok(Self::from_index_unchecked(index))
        } else {
            Err(PatternError::InvalidEncoding)
        }
    }

    /// Caller guarantees `index < 9`.
    pub const fn from_index_unchecked(index: u8) -> Self {
        Self::new_unchecked(index / GRID_SIDE, index % GRID_SIDE)
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn col(self) -> u8 {
        self.col
    }

    /// Flattened index in `0..=8`, also the serialized byte value.
    pub const fn index(self) -> u8 {
        self.row * GRID_SIDE + self.col
    }

    /// All 9 cells in row-major order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..GRID_CELLS as u8).map(Self::from_index_unchecked)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
