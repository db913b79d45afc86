//! Display motion state.

use super::Phase;

/// What the display is doing between `run` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhaseMotion {
    /// At the requested phase.
    #[default]
    Idle,

    /// Stepping forward one phase at a time toward `target`.
    Stepping {
        /// Requested phase.
        target: Phase,
    },

    /// Walking backward to `boundary` before continuing toward `resume`.
    ///
    /// `boundary` is 30 when leaving phase 59 and 0 when leaving phase 29.
    Resetting {
        /// Phase at which the reset ends.
        boundary: Phase,
        /// Requested phase to continue toward afterwards.
        resume: Phase,
    },
}

impl PhaseMotion {
    /// The phase being moved toward, given the phase currently shown.
    ///
    /// While resetting this is the boundary, not the eventual target.
    pub fn target(&self, current: Phase) -> Phase {
        match *self {
            PhaseMotion::Idle => current,
            PhaseMotion::Stepping { target } => target,
            PhaseMotion::Resetting { boundary, .. } => boundary,
        }
    }

    /// Whether a reset maneuver is underway.
    #[inline]
    pub fn is_resetting(&self) -> bool {
        matches!(self, PhaseMotion::Resetting { .. })
    }
}
