#![no_std]

extern crate alloc;

use alloc::string::String;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub use cell::*;
pub use codec::*;
pub use engine::*;
pub use error::*;
pub use frame::*;
pub use geom::*;
pub use hit::*;
pub use pattern::*;
pub use rings::*;
pub use trace::*;

mod cell;
mod codec;
mod engine;
mod error;
mod frame;
mod geom;
mod hit;
mod pattern;
mod rings;
mod trace;

/// Visual treatment of the pattern currently on screen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    #[default]
    Correct,
    Animate,
    Wrong,
}

impl DisplayMode {
    /// Stable numeric form used by the saved snapshot.
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Correct => 0,
            Self::Animate => 1,
            Self::Wrong => 2,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Result<Self> {
        match ordinal {
            0 => Ok(Self::Correct),
            1 => Ok(Self::Animate),
            2 => Ok(Self::Wrong),
            _ => Err(PatternError::InvalidDisplayMode),
        }
    }
}

/// Host-facing notifications. One enum instead of a listener interface with
/// four methods, so tests can assert whole event logs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternEvent {
    Started,
    CellAdded(CellSeq),
    Detected(CellSeq),
    Cleared,
}

/// Events collected during a single dispatch.
pub type PatternEvents = SmallVec<[PatternEvent; 4]>;

/// Redraw request attached to an outcome. Partial rects come from the
/// move-batch dirty-region union; everything else that changes state asks
/// for a full redraw.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Redraw {
    None,
    Partial(RectPx),
    Full,
}

impl Redraw {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// What the embedding layer must do with the auto-reset timer after an
/// operation. At most one timer is ever outstanding: `Schedule` implies
/// dropping any previous one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TimerCmd {
    #[default]
    Keep,
    Cancel,
    Schedule(u64),
}

/// Result of feeding one touch sample batch to the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchOutcome {
    /// False only while input is disabled; the event should be ignored.
    pub handled: bool,
    pub events: PatternEvents,
    pub redraw: Redraw,
    pub timer: TimerCmd,
    /// True when a cell was added and haptic feedback is enabled.
    pub haptic: bool,
}

impl TouchOutcome {
    pub fn unhandled() -> Self {
        Self {
            handled: false,
            events: PatternEvents::new(),
            redraw: Redraw::None,
            timer: TimerCmd::Keep,
            haptic: false,
        }
    }

    pub fn has_update(&self) -> bool {
        self.redraw.has_update() || !self.events.is_empty()
    }
}

/// Result of a host-driven pattern/mode change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModeUpdate {
    pub redraw: Redraw,
    pub timer: TimerCmd,
}

/// Snapshot of the transient widget state, taken on teardown and applied on
/// recreation. The pattern travels in its serialized form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    pub pattern: String,
    pub display_mode: u8,
    pub input_enabled: bool,
    pub stealth: bool,
    pub haptics: bool,
}

impl Default for SavedState {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            display_mode: DisplayMode::Correct.ordinal(),
            input_enabled: true,
            stealth: false,
            haptics: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mode_ordinals_are_stable() {
        for mode in [DisplayMode::Correct, DisplayMode::Animate, DisplayMode::Wrong] {
            assert_eq!(DisplayMode::from_ordinal(mode.ordinal()).unwrap(), mode);
        }
        assert_eq!(
            DisplayMode::from_ordinal(3),
            Err(PatternError::InvalidDisplayMode)
        );
    }

    #[test]
    fn saved_state_round_trips_through_json() {
        let saved = SavedState {
            pattern: pattern_to_string(&[Cell::new_unchecked(1, 1), Cell::new_unchecked(1, 2)]),
            display_mode: DisplayMode::Wrong.ordinal(),
            input_enabled: false,
            stealth: true,
            haptics: false,
        };

        let json = serde_json::to_string(&saved).unwrap();
        let back: SavedState = serde_json::from_str(&json).unwrap();

        assert_eq!(back, saved);
    }
}
