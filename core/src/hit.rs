//! Touch-point to cell resolution.
//!
//! Each square only reacts inside a centered active zone scaled by the hit
//! factor, so sloppy drags between rows do not collect stray cells. A jump
//! that skips straight over a cell gets the midpoint filled in by the caller
//! via [`gap_candidate`].

use crate::{Cell, GRID_SIDE, GridGeometry, PointPx, Px, VisitedGrid};

/// Default fraction of a square's side that is touch-sensitive.
pub const DEFAULT_HIT_FACTOR: Px = 0.41;

fn row_at(geom: &GridGeometry, y: Px, hit_factor: Px) -> Option<u8> {
    let square = geom.square_height();
    let hit_size = square * hit_factor;
    let offset = geom.inset_top() + (square - hit_size) / 2.0;
    for row in 0..GRID_SIDE {
        let hit_top = offset + square * row as Px;
        if y >= hit_top && y <= hit_top + hit_size {
            return Some(row);
        }
    }
    None
}

fn col_at(geom: &GridGeometry, x: Px, hit_factor: Px) -> Option<u8> {
    let square = geom.square_width();
    let hit_size = square * hit_factor;
    let offset = geom.inset_left() + (square - hit_size) / 2.0;
    for col in 0..GRID_SIDE {
        let hit_left = offset + square * col as Px;
        if x >= hit_left && x <= hit_left + hit_size {
            return Some(col);
        }
    }
    None
}

/// Cell under `point`, or `None` when the point misses every active zone or
/// lands on an already-visited cell.
pub fn hit_cell(
    geom: &GridGeometry,
    hit_factor: Px,
    visited: &VisitedGrid,
    point: PointPx,
) -> Option<Cell> {
    let row = row_at(geom, point.y, hit_factor)?;
    let col = col_at(geom, point.x, hit_factor)?;
    let cell = Cell::new_unchecked(row, col);
    if visited.is_visited(cell) {
        None
    } else {
        Some(cell)
    }
}

/// Midpoint cell skipped by a jump from `last` to `hit`, if any.
///
/// An axis is bridged only when it jumps by exactly 2 while the other axis
/// moved 0 or 2, so straight and perfectly diagonal jumps fill in, knight
/// moves do not. The caller still has to check the candidate against the
/// visited lookup before inserting it.
pub fn gap_candidate(last: Cell, hit: Cell) -> Option<Cell> {
    let d_row = hit.row() as i8 - last.row() as i8;
    let d_col = hit.col() as i8 - last.col() as i8;

    let mut fill_row = last.row();
    let mut fill_col = last.col();
    if d_row.abs() == 2 && d_col.abs() != 1 {
        fill_row = (last.row() as i8 + d_row.signum()) as u8;
    }
    if d_col.abs() == 2 && d_row.abs() != 1 {
        fill_col = (last.col() as i8 + d_col.signum()) as u8;
    }

    let fill = Cell::new_unchecked(fill_row, fill_col);
    (fill != last).then_some(fill)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Insets;

    fn geom() -> GridGeometry {
        GridGeometry::new(300.0, 300.0, Insets::default())
    }

    fn cell(row: u8, col: u8) -> Cell {
        Cell::new_unchecked(row, col)
    }

    #[test]
    fn square_centers_hit_for_any_positive_factor() {
        let geom = geom();
        let visited = VisitedGrid::default();

        for factor in [0.01, DEFAULT_HIT_FACTOR, 0.99] {
            for target in Cell::all() {
                let hit = hit_cell(&geom, factor, &visited, geom.center(target));
                assert_eq!(hit, Some(target), "factor {factor}");
            }
        }
    }

    #[test]
    fn square_corners_never_hit_below_full_factor() {
        let geom = geom();
        let visited = VisitedGrid::default();

        // Top-left corner of the (1, 1) square.
        let corner = PointPx::new(100.0, 100.0);
        assert_eq!(hit_cell(&geom, 0.97, &visited, corner), None);
        assert_eq!(hit_cell(&geom, DEFAULT_HIT_FACTOR, &visited, corner), None);
    }

    #[test]
    fn visited_cells_stop_registering() {
        let geom = geom();
        let mut visited = VisitedGrid::default();
        let center = geom.center(cell(0, 0));

        assert_eq!(hit_cell(&geom, 0.5, &visited, center), Some(cell(0, 0)));
        visited.mark(cell(0, 0));
        assert_eq!(hit_cell(&geom, 0.5, &visited, center), None);
    }

    #[test]
    fn points_between_active_zones_miss() {
        let geom = geom();
        let visited = VisitedGrid::default();

        // On the row boundary, outside the active zone of either row.
        let between = PointPx::new(150.0, 100.0);
        assert_eq!(hit_cell(&geom, 0.41, &visited, between), None);
    }

    #[test]
    fn straight_jumps_fill_the_midpoint() {
        assert_eq!(gap_candidate(cell(0, 0), cell(2, 0)), Some(cell(1, 0)));
        assert_eq!(gap_candidate(cell(0, 0), cell(0, 2)), Some(cell(0, 1)));
        assert_eq!(gap_candidate(cell(0, 0), cell(2, 2)), Some(cell(1, 1)));
        assert_eq!(gap_candidate(cell(2, 2), cell(0, 0)), Some(cell(1, 1)));
        assert_eq!(gap_candidate(cell(2, 0), cell(0, 2)), Some(cell(1, 1)));
    }

    #[test]
    fn short_and_knight_moves_do_not_fill() {
        assert_eq!(gap_candidate(cell(0, 0), cell(0, 1)), None);
        assert_eq!(gap_candidate(cell(0, 0), cell(1, 1)), None);
        assert_eq!(gap_candidate(cell(0, 0), cell(2, 1)), None);
        assert_eq!(gap_candidate(cell(1, 0), cell(0, 2)), None);
    }
}
