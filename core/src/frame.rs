//! Render view-model. The widget layer asks for a [`Frame`] and paints it;
//! every draw rule lives here, not in the renderer.

use alloc::vec::Vec;

use crate::*;

/// Drawable state of one ring.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RingFrame {
    pub cell: Cell,
    pub center: PointPx,
    /// Ring shows as part of the pattern (stealth and retraction dim this).
    pub lit: bool,
    pub phase: RingPhase,
    pub progress: f32,
}

/// Everything needed to paint one frame of the widget.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub mode: DisplayMode,
    pub rings: [RingFrame; GRID_CELLS],
    /// Polyline of the connecting line; during an error this is the
    /// retracting remainder instead of the visited centers.
    pub path: Vec<PointPx>,
    /// Extra endpoint following the finger (or the animate cursor).
    pub rubber: Option<PointPx>,
}

impl PatternLock {
    pub fn frame(&self, now_ms: u64) -> Frame {
        // Stealth hides the trace unless the widget is showing an error.
        let draw_visuals = !self.is_stealth() || self.display_mode() == DisplayMode::Wrong;
        let trace_active = self.error_trace().is_some();

        let rings = core::array::from_fn(|index| {
            let cell = Cell::from_index_unchecked(index as u8);
            let anim = self.rings().get(cell);
            // Once the retraction settles a ring it goes back to the plain
            // look even though the cell is still in the pattern.
            let lit = self.visited().is_visited(cell)
                && draw_visuals
                && (!trace_active || anim.phase() != RingPhase::Idle);
            RingFrame {
                cell,
                center: self.geometry().center(cell),
                lit,
                phase: anim.phase(),
                progress: anim.progress(now_ms),
            }
        });

        let (path, rubber) = if let Some(trace) = self.error_trace() {
            (trace.path_points(now_ms).unwrap_or_default(), None)
        } else if draw_visuals {
            let path: Vec<PointPx> = self
                .visited_prefix_centers()
                .collect();
            let rubber = if (self.in_progress() || self.display_mode() == DisplayMode::Animate)
                && !path.is_empty()
            {
                Some(self.cursor())
            } else {
                None
            };
            (path, rubber)
        } else {
            (Vec::new(), None)
        };

        Frame {
            mode: self.display_mode(),
            rings,
            path,
            rubber,
        }
    }

    fn visited_prefix_centers(&self) -> impl Iterator<Item = PointPx> + '_ {
        self.pattern()
            .iter()
            .take_while(|&&cell| self.visited().is_visited(cell))
            .map(|&cell| self.geometry().center(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lock() -> PatternLock {
        PatternLock::new(GridGeometry::new(300.0, 300.0, Insets::default()))
    }

    fn cell(row: u8, col: u8) -> Cell {
        Cell::new_unchecked(row, col)
    }

    fn seq(cells: &[(u8, u8)]) -> CellSeq {
        cells.iter().map(|&(row, col)| cell(row, col)).collect()
    }

    fn lit_count(frame: &Frame) -> usize {
        frame.rings.iter().filter(|ring| ring.lit).count()
    }

    #[test]
    fn gesture_frame_shows_path_and_rubber_band() {
        let mut lock = lock();
        lock.touch_down(0, lock.geometry().center(cell(0, 0)));
        lock.touch_move(16, &[PointPx::new(110.0, 60.0)]);

        let frame = lock.frame(16);
        assert_eq!(lit_count(&frame), 1);
        assert_eq!(frame.path, alloc::vec![lock.geometry().center(cell(0, 0))]);
        assert_eq!(frame.rubber, Some(PointPx::new(110.0, 60.0)));

        lock.touch_up(32);
        let frame = lock.frame(32);
        assert_eq!(frame.rubber, None);
        assert_eq!(frame.path.len(), 1);
    }

    #[test]
    fn stealth_hides_everything_until_wrong() {
        let mut lock = lock();
        lock.set_stealth(true);
        lock.set_pattern(DisplayMode::Correct, &seq(&[(0, 0), (0, 1)]), 0)
            .unwrap();

        let hidden = lock.frame(0);
        assert_eq!(lit_count(&hidden), 0);
        assert!(hidden.path.is_empty());

        lock.set_display_mode(DisplayMode::Wrong, 0).unwrap();
        let shown = lock.frame(0);
        // Stealth suppresses the error trace, so the plain path comes back
        // in wrong mode.
        assert_eq!(lit_count(&shown), 2);
        assert_eq!(shown.path.len(), 2);
    }

    #[test]
    fn retraction_replaces_the_path_and_unlights_settled_rings() {
        let mut lock = lock();
        lock.set_pattern(DisplayMode::Wrong, &seq(&[(0, 0), (0, 1), (0, 2)]), 0)
            .unwrap();

        let start = lock.frame(0);
        // First ring already settled; its cell is no longer lit.
        assert!(!start.rings[cell(0, 0).index() as usize].lit);
        assert!(start.rings[cell(0, 1).index() as usize].lit);
        assert_eq!(start.path.len(), 3);
        assert_eq!(start.rubber, None);

        lock.tick(250);
        let mid = lock.frame(250);
        assert!(!mid.rings[cell(0, 1).index() as usize].lit);
        assert_eq!(mid.path.len(), 2);

        lock.tick(500);
        let done = lock.frame(500);
        assert_eq!(lit_count(&done), 0);
        assert!(done.path.is_empty());
    }

    #[test]
    fn animate_frame_reveals_and_follows_the_cursor() {
        let mut lock = lock();
        lock.set_pattern(DisplayMode::Animate, &seq(&[(0, 0), (0, 2)]), 0)
            .unwrap();

        lock.tick(0);
        let dark = lock.frame(0);
        assert!(dark.path.is_empty());
        assert_eq!(dark.rubber, None);

        lock.tick(1_050);
        let mid = lock.frame(1_050);
        assert_eq!(mid.path.len(), 1);
        assert_eq!(mid.rubber, Some(lock.cursor()));
        assert_eq!(lit_count(&mid), 1);
    }
}
