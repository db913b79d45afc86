//! Display module for moon-display.
//!
//! Maps the 60 lunation phases onto pivot and leadscrew positions and drives
//! the two axes from phase to phase, including the reset maneuvers at the
//! new-moon and full-moon boundaries.

mod controller;
mod state;
mod table;

pub use controller::MoonDisplay;
pub use state::PhaseMotion;
pub use table::{angle_for_phase, PhaseMap, PIVOT_ANGLES};

use serde::{Deserialize, Serialize};

use crate::error::DisplayError;

/// Number of display phases per lunation.
pub const PHASE_COUNT: u8 = 60;

/// One of the 60 display phases.
///
/// Phase 0 is new moon, 30 full moon. Both show the same mechanical pose; they
/// differ only in which half of the lunation follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(try_from = "u8", into = "u8")]
pub struct Phase(u8);

impl Phase {
    /// New moon.
    pub const NEW: Self = Self(0);

    /// Full moon.
    pub const FULL: Self = Self(30);

    /// Create a phase, or `None` past 59.
    #[inline]
    pub const fn new(value: u8) -> Option<Self> {
        if value < PHASE_COUNT {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Get the raw value (0..=59).
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Every phase in order.
    pub fn all() -> impl Iterator<Item = Phase> {
        (0..PHASE_COUNT).map(Phase)
    }

    /// The phase sharing this one's pose across the lunation halves.
    #[inline]
    pub const fn partner(self) -> Self {
        Self((self.0 + 30) % PHASE_COUNT)
    }

    /// Whether this phase is in the waxing half (0..=29).
    #[inline]
    pub const fn is_waxing(self) -> bool {
        self.0 < 30
    }
}

impl TryFrom<i32> for Phase {
    type Error = DisplayError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Phase::new)
            .ok_or(DisplayError::PhaseOutOfRange(value))
    }
}

impl TryFrom<u8> for Phase {
    type Error = DisplayError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Phase::new(value).ok_or(DisplayError::PhaseOutOfRange(value.into()))
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> Self {
        phase.0
    }
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the two display axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisId {
    /// Terminator angle.
    Pivot,
    /// Terminator bend.
    Leadscrew,
}
