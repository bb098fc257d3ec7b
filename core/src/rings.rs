use crate::{Cell, GRID_CELLS};

/// Duration of the ring growth when a cell is pressed.
pub const PRESS_ANIM_MS: u64 = 150;

/// Duration of the ring pulse when a cell joins an error sequence.
pub const ERROR_PULSE_MS: u64 = 250;

pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RingPhase {
    #[default]
    Idle,
    Pressed,
    Error,
}

/// Animation state of a single ring. Time never advances on its own; progress
/// is derived from the caller's clock.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RingAnim {
    phase: RingPhase,
    since_ms: u64,
}

impl RingAnim {
    pub fn phase(&self) -> RingPhase {
        self.phase
    }

    fn start(&mut self, phase: RingPhase, now_ms: u64) {
        self.phase = phase;
        self.since_ms = now_ms;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn duration_ms(&self) -> u64 {
        match self.phase {
            RingPhase::Idle => 0,
            RingPhase::Pressed => PRESS_ANIM_MS,
            RingPhase::Error => ERROR_PULSE_MS,
        }
    }

    /// Linear animation progress in `0..=1`; idle rings report 1.0.
    pub fn progress(&self, now_ms: u64) -> f32 {
        let duration = self.duration_ms();
        if duration == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.since_ms);
        if elapsed >= duration {
            1.0
        } else {
            elapsed as f32 / duration as f32
        }
    }

    /// True while the phase still produces new frames. A finished error ring
    /// keeps its phase (the color holds) but stops animating.
    pub fn is_active(&self, now_ms: u64) -> bool {
        self.phase != RingPhase::Idle && self.progress(now_ms) < 1.0
    }
}

/// The nine ring states, owned in one place. Everything that wants to mutate
/// a ring goes through these methods.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RingGrid([RingAnim; GRID_CELLS]);

impl RingGrid {
    pub fn get(&self, cell: Cell) -> RingAnim {
        self.0[cell.index() as usize]
    }

    pub fn press(&mut self, cell: Cell, now_ms: u64) {
        self.0[cell.index() as usize].start(RingPhase::Pressed, now_ms);
    }

    pub fn error(&mut self, cell: Cell, now_ms: u64) {
        self.0[cell.index() as usize].start(RingPhase::Error, now_ms);
    }

    pub fn reset(&mut self, cell: Cell) {
        self.0[cell.index() as usize].reset();
    }

    pub fn reset_all(&mut self) {
        self.0 = Default::default();
    }

    pub fn any_active(&self, now_ms: u64) -> bool {
        self.0.iter().any(|ring| ring.is_active(now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(row: u8, col: u8) -> Cell {
        Cell::new_unchecked(row, col)
    }

    #[test]
    fn press_progress_runs_to_completion() {
        let mut rings = RingGrid::default();
        rings.press(cell(0, 0), 1_000);
        let ring = rings.get(cell(0, 0));

        assert_eq!(ring.phase(), RingPhase::Pressed);
        assert_eq!(ring.progress(1_000), 0.0);
        assert_eq!(ring.progress(1_000 + PRESS_ANIM_MS / 2), 0.5);
        assert_eq!(ring.progress(1_000 + PRESS_ANIM_MS), 1.0);
        assert!(!ring.is_active(1_000 + PRESS_ANIM_MS));
    }

    #[test]
    fn finished_error_ring_keeps_its_phase() {
        let mut rings = RingGrid::default();
        rings.error(cell(2, 1), 0);

        assert!(rings.any_active(0));
        assert!(!rings.any_active(ERROR_PULSE_MS));
        assert_eq!(rings.get(cell(2, 1)).phase(), RingPhase::Error);
    }

    #[test]
    fn reset_returns_a_ring_to_idle() {
        let mut rings = RingGrid::default();
        rings.press(cell(1, 1), 10);
        rings.reset(cell(1, 1));

        assert_eq!(rings.get(cell(1, 1)).phase(), RingPhase::Idle);
        assert_eq!(rings.get(cell(1, 1)).progress(10), 1.0);

        rings.press(cell(1, 1), 10);
        rings.press(cell(0, 2), 10);
        rings.reset_all();
        assert!(!rings.any_active(10));
    }

    #[test]
    fn ease_out_cubic_is_clamped_and_monotonic() {
        assert_eq!(ease_out_cubic(-1.0), 0.0);
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        assert!(ease_out_cubic(0.25) < ease_out_cubic(0.5));
        assert!(ease_out_cubic(0.5) > 0.5);
    }
}
