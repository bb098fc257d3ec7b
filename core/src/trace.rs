//! The error "undo" traversal: after a wrong pattern the connecting line
//! retracts segment by segment, and each completed segment returns its ring
//! to idle.

use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::{Cell, CellSeq, GridGeometry, PointPx, ease_out_cubic};

/// Time per retract segment; also the per-cell share of the auto-reset delay.
pub const ERROR_STEP_MS: u64 = 250;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveSegment {
    pub from: PointPx,
    pub to: PointPx,
}

/// One error sequence over a fixed set of cells. Built fresh every time an
/// error starts, so a new gesture can never leave a stale step counter
/// pointing past the cell list.
#[derive(Clone, Debug)]
pub struct ErrorTrace {
    cells: CellSeq,
    segments: SmallVec<[MoveSegment; 8]>,
    started_ms: u64,
    settled: usize,
}

impl ErrorTrace {
    /// Pairs each cell's center with the next one's; the last cell has no
    /// successor and contributes no segment.
    pub fn build(cells: &[Cell], geom: &GridGeometry, now_ms: u64) -> Self {
        let segments = cells
            .windows(2)
            .map(|pair| MoveSegment {
                from: geom.center(pair[0]),
                to: geom.center(pair[1]),
            })
            .collect();
        Self {
            cells: CellSeq::from_slice(cells),
            segments,
            started_ms: now_ms,
            settled: 0,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Delay before the widget clears itself after the error.
    pub fn reset_delay_ms(&self) -> u64 {
        ERROR_STEP_MS * self.cells.len() as u64
    }

    fn step(&self, now_ms: u64) -> usize {
        (now_ms.saturating_sub(self.started_ms) / ERROR_STEP_MS) as usize
    }

    /// All segments retracted; nothing left to draw.
    pub fn finished(&self, now_ms: u64) -> bool {
        self.step(now_ms) >= self.segments.len()
    }

    /// Cells whose rings are due back at idle since the last call. The first
    /// cell settles immediately when the trace starts; each further cell
    /// settles as its segment finishes. Steps past the end clamp instead of
    /// indexing out of range.
    pub fn advance(&mut self, now_ms: u64) -> &[Cell] {
        if self.settled >= self.cells.len() {
            return &[];
        }
        let step = self.step(now_ms);
        let mut target = step + 1;
        if target > self.cells.len() {
            log::debug!(
                "error retract step {} past {} cells, clamping",
                step,
                self.cells.len()
            );
            target = self.cells.len();
        }
        if target <= self.settled {
            return &[];
        }
        let start = self.settled;
        self.settled = target;
        &self.cells[start..target]
    }

    /// Moving head of the retracting line, eased within the current segment.
    pub fn head(&self, now_ms: u64) -> Option<PointPx> {
        let step = self.step(now_ms);
        let segment = self.segments.get(step)?;
        let within = now_ms.saturating_sub(self.started_ms) % ERROR_STEP_MS;
        let t = ease_out_cubic(within as f32 / ERROR_STEP_MS as f32);
        Some(segment.from.lerp(segment.to, t))
    }

    /// Polyline still on screen: the moving head followed by the untouched
    /// segment endpoints. `None` once the retraction is done.
    pub fn path_points(&self, now_ms: u64) -> Option<Vec<PointPx>> {
        let head = self.head(now_ms)?;
        let step = self.step(now_ms);
        let mut points = Vec::with_capacity(self.segments.len() - step + 1);
        points.push(head);
        points.extend(self.segments[step..].iter().map(|segment| segment.to));
        Some(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Insets;

    fn geom() -> GridGeometry {
        GridGeometry::new(300.0, 300.0, Insets::default())
    }

    fn cells(indices: &[u8]) -> CellSeq {
        indices
            .iter()
            .map(|&index| Cell::from_index(index).unwrap())
            .collect()
    }

    #[test]
    fn build_pairs_centers_and_drops_the_last() {
        let trace = ErrorTrace::build(&cells(&[0, 1, 2]), &geom(), 0);

        assert_eq!(trace.cell_count(), 3);
        assert_eq!(trace.reset_delay_ms(), 750);
        assert_eq!(trace.path_points(0).unwrap().len(), 3);
    }

    #[test]
    fn rings_settle_head_to_tail_on_step_boundaries() {
        let mut trace = ErrorTrace::build(&cells(&[0, 1, 2]), &geom(), 1_000);

        assert_eq!(trace.advance(1_000), &cells(&[0])[..]);
        assert_eq!(trace.advance(1_100), &[] as &[Cell]);
        assert_eq!(trace.advance(1_250), &cells(&[1])[..]);
        assert_eq!(trace.advance(1_500), &cells(&[2])[..]);
        assert_eq!(trace.advance(1_750), &[] as &[Cell]);
    }

    #[test]
    fn late_ticks_clamp_instead_of_indexing_past_the_end() {
        let mut trace = ErrorTrace::build(&cells(&[0, 4, 8]), &geom(), 0);

        assert_eq!(trace.advance(10_000), &cells(&[0, 4, 8])[..]);
        assert_eq!(trace.advance(20_000), &[] as &[Cell]);
    }

    #[test]
    fn head_slides_toward_the_next_center_and_ends() {
        let geometry = geom();
        let trace = ErrorTrace::build(&cells(&[0, 1]), &geometry, 0);

        let start = trace.head(0).unwrap();
        assert_eq!(start, geometry.center(Cell::from_index(0).unwrap()));

        let mid = trace.head(125).unwrap();
        assert!(mid.x > start.x);
        assert_eq!(mid.y, start.y);

        assert!(trace.finished(ERROR_STEP_MS));
        assert_eq!(trace.head(ERROR_STEP_MS), None);
        assert_eq!(trace.path_points(ERROR_STEP_MS), None);
    }

    #[test]
    fn single_cell_trace_finishes_immediately_but_still_settles_its_ring() {
        let mut trace = ErrorTrace::build(&cells(&[4]), &geom(), 0);

        assert!(trace.finished(0));
        assert_eq!(trace.reset_delay_ms(), 250);
        assert_eq!(trace.head(0), None);
        assert_eq!(trace.advance(0), &cells(&[4])[..]);
    }
}
