use smallvec::SmallVec;

use crate::{Cell, GRID_CELLS, GRID_SIDE};

/// Ordered cells of one gesture. Nine slots cover every possible pattern
/// without touching the heap.
pub type CellSeq = SmallVec<[Cell; GRID_CELLS]>;

/// 3x3 membership lookup kept in lockstep with the pattern sequence.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VisitedGrid([[bool; GRID_SIDE as usize]; GRID_SIDE as usize]);

impl VisitedGrid {
    pub fn is_visited(&self, cell: Cell) -> bool {
        self.0[cell.row() as usize][cell.col() as usize]
    }

    pub(crate) fn mark(&mut self, cell: Cell) {
        self.0[cell.row() as usize][cell.col() as usize] = true;
    }

    pub(crate) fn clear_all(&mut self) {
        self.0 = Default::default();
    }

    pub fn count(&self) -> usize {
        self.0.iter().flatten().filter(|&&visited| visited).count()
    }
}

/// The pattern entered so far: ordered unique cells plus the parallel
/// visited lookup.
///
/// All mutation goes through this type so the sequence and the lookup cannot
/// drift apart. The one sanctioned exception is the animate reveal, which
/// re-marks a prefix of an already-frozen pattern via [`reveal_prefix`].
///
/// [`reveal_prefix`]: PatternState::reveal_prefix
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatternState {
    cells: CellSeq,
    visited: VisitedGrid,
}

impl PatternState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `cell` unless it is already part of the pattern.
    pub fn push(&mut self, cell: Cell) -> bool {
        if self.visited.is_visited(cell) {
            return false;
        }
        self.cells.push(cell);
        self.visited.mark(cell);
        true
    }

    /// Replaces the whole pattern; repeated cells collapse to their first
    /// occurrence.
    pub fn replace<I: IntoIterator<Item = Cell>>(&mut self, cells: I) {
        self.clear();
        for cell in cells {
            self.push(cell);
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.visited.clear_all();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn last(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn snapshot(&self) -> CellSeq {
        self.cells.clone()
    }

    pub fn visited(&self) -> &VisitedGrid {
        &self.visited
    }

    /// Cells from the front of the sequence that are currently marked
    /// visited. Equals the full pattern outside an animate reveal.
    pub fn visited_prefix(&self) -> &[Cell] {
        let mut len = 0;
        for &cell in self.cells.iter() {
            if !self.visited.is_visited(cell) {
                break;
            }
            len += 1;
        }
        &self.cells[..len]
    }

    /// Marks only the first `n` cells visited, keeping the sequence intact.
    /// Used by the animate reveal; regular gestures never call this.
    pub fn reveal_prefix(&mut self, n: usize) {
        self.visited.clear_all();
        for &cell in self.cells.iter().take(n) {
            self.visited.mark(cell);
        }
    }
}
