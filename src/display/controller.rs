//! Phase controller for the two-axis display.
//!
//! The display only ever steps forward one phase at a time. The mechanism
//! cannot continue past phase 59 or past phase 29, so leaving either one
//! starts a reset: the axes walk backward to the boundary pose (30 or 0), which
//! is physically the same as its partner phase, and stepping resumes from there.

use crate::error::{DisplayError, Error, Result};
use crate::illumination::Illumination;
use crate::motor::Axis;

use super::state::PhaseMotion;
use super::table::PhaseMap;
use super::{AxisId, Phase};

/// Moon phase display driven by a pivot axis and a leadscrew axis.
///
/// # Example
///
/// ```rust,ignore
/// let mut display = MoonDisplay::new(pivot, leadscrew, illuminator, PhaseMap::new(), saved_phase);
/// display.show_phase(lunation::phase_at(now).value().into())?;
///
/// loop {
///     if let Some(phase) = display.run() {
///         record.phase = phase;
///     }
/// }
/// ```
pub struct MoonDisplay<A: Axis, I: Illumination> {
    pivot: A,
    leadscrew: A,
    illumination: I,
    map: PhaseMap,
    /// Phase shown, or being moved to.
    current: Phase,
    motion: PhaseMotion,
    /// A step has been commanded since the last reported arrival.
    underway: bool,
}

impl<A: Axis, I: Illumination> MoonDisplay<A, I> {
    /// Create a display assumed to be showing `phase`.
    pub fn new(pivot: A, leadscrew: A, illumination: I, map: PhaseMap, phase: Phase) -> Self {
        let mut display = Self {
            pivot,
            leadscrew,
            illumination,
            map,
            current: phase,
            motion: PhaseMotion::Idle,
            underway: false,
        };
        display.assume(phase);
        display
    }

    /// Advance the display. Call as often as practical.
    ///
    /// Returns the phase the display has just come to rest at, if any.
    pub fn run(&mut self) -> Option<Phase> {
        self.illumination.tick();

        if self.is_moving() {
            return None;
        }

        match self.motion {
            PhaseMotion::Stepping { target } if target != self.current => {
                self.illumination.on_transition_to(target);
                let next = match self.current.value() {
                    59 => self.begin_reset(Phase::FULL, target),
                    29 => self.begin_reset(Phase::NEW, target),
                    n => Phase(n + 1),
                };
                self.step_to(next);
                return None;
            }
            PhaseMotion::Stepping { .. } => {
                self.motion = PhaseMotion::Idle;
            }
            PhaseMotion::Resetting { boundary, .. } if boundary != self.current => {
                self.step_to(Phase(self.current.value().saturating_sub(1)));
                return None;
            }
            PhaseMotion::Resetting { boundary, resume } => {
                self.current = boundary.partner();
                self.motion = if resume == self.current {
                    PhaseMotion::Idle
                } else {
                    PhaseMotion::Stepping { target: resume }
                };

                #[cfg(feature = "defmt")]
                defmt::debug!("reset complete, now at phase {}", self.current.value());
            }
            PhaseMotion::Idle => {}
        }

        if !self.underway {
            return None;
        }

        self.underway = false;
        self.illumination.on_arrived_at(self.current);

        #[cfg(feature = "defmt")]
        defmt::debug!("arrived at phase {}", self.current.value());

        Some(self.current)
    }

    /// Request that the display move to `phase`.
    ///
    /// # Errors
    ///
    /// Returns `DisplayError::Busy` while either axis is moving or a reset is
    /// underway, and `DisplayError::PhaseOutOfRange` outside 0..=59. The
    /// display is unchanged on error.
    pub fn show_phase(&mut self, phase: i32) -> Result<()> {
        if self.is_resetting() || self.is_moving() {
            #[cfg(feature = "defmt")]
            defmt::warn!("phase {} requested while moving", phase);
            return Err(Error::Display(DisplayError::Busy));
        }

        let target = Phase::try_from(phase).map_err(|e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("phase {} out of range", phase);
            Error::Display(e)
        })?;

        self.motion = if target == self.current {
            PhaseMotion::Idle
        } else {
            PhaseMotion::Stepping { target }
        };
        Ok(())
    }

    /// Declare that the display is showing `phase` without moving it.
    pub fn assume(&mut self, phase: Phase) {
        let (pivot, leadscrew) = self.map.positions(phase);
        self.pivot.set_location(pivot);
        self.leadscrew.set_location(leadscrew);
        self.current = phase;
        self.motion = PhaseMotion::Idle;
        self.underway = false;
        self.illumination.on_arrived_at(phase);
    }

    /// Halt both axes and abandon the current target, including any reset.
    ///
    /// Each axis may still take one more step.
    pub fn stop(&mut self) {
        self.pivot.stop();
        self.leadscrew.stop();
        self.motion = PhaseMotion::Idle;
    }

    /// Phase shown, or being moved to.
    ///
    /// During a reset this follows the backward walk, so a 29 to 30 move
    /// passes through 0 before being relabelled 30.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.current
    }

    /// Phase being moved toward; the boundary phase during a reset.
    #[inline]
    pub fn target(&self) -> Phase {
        self.motion.target(self.current)
    }

    /// Current motion state.
    #[inline]
    pub fn motion(&self) -> PhaseMotion {
        self.motion
    }

    /// Whether a reset maneuver is underway.
    #[inline]
    pub fn is_resetting(&self) -> bool {
        self.motion.is_resetting()
    }

    /// Whether either axis is moving.
    pub fn is_moving(&self) -> bool {
        self.pivot.is_moving() || self.leadscrew.is_moving()
    }

    /// Location of one axis in steps.
    pub fn axis_position(&self, axis: AxisId) -> i32 {
        self.axis(axis).location()
    }

    /// Jog one axis by `steps` without changing its reported location.
    ///
    /// Used to trim the mechanism against the phase it is supposed to show.
    pub fn turn_axis(&mut self, axis: AxisId, steps: i32) {
        let axis = self.axis(axis);
        axis.set_location(axis.location().wrapping_sub(steps));
        axis.drive(steps);
    }

    /// Phase-to-position mapping in use.
    #[inline]
    pub fn map(&self) -> &PhaseMap {
        &self.map
    }

    /// The illumination stage.
    #[inline]
    pub fn illumination(&self) -> &I {
        &self.illumination
    }

    /// The illumination stage, mutably, for brightness and ambient updates.
    #[inline]
    pub fn illumination_mut(&mut self) -> &mut I {
        &mut self.illumination
    }

    /// Consume the display, returning the axes and illumination.
    pub fn into_parts(self) -> (A, A, I) {
        (self.pivot, self.leadscrew, self.illumination)
    }

    fn axis(&self, axis: AxisId) -> &A {
        match axis {
            AxisId::Pivot => &self.pivot,
            AxisId::Leadscrew => &self.leadscrew,
        }
    }

    fn begin_reset(&mut self, boundary: Phase, resume: Phase) -> Phase {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "leaving phase {}, resetting to {}",
            self.current.value(),
            boundary.value()
        );

        self.motion = PhaseMotion::Resetting { boundary, resume };
        Phase(self.current.value() - 1)
    }

    fn step_to(&mut self, next: Phase) {
        let (pivot, leadscrew) = self.map.positions(next);
        self.current = next;
        self.leadscrew.drive_to(leadscrew);
        self.pivot.drive_to(pivot);
        self.underway = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Axis that finishes every move instantly.
    #[derive(Default)]
    struct InstantAxis {
        location: Cell<i32>,
    }

    impl Axis for InstantAxis {
        fn drive(&self, steps: i32) {
            self.location.set(self.location.get() + steps);
        }
        fn drive_to(&self, location: i32) {
            self.location.set(location);
        }
        fn stop(&self) {}
        fn location(&self) -> i32 {
            self.location.get()
        }
        fn set_location(&self, location: i32) {
            self.location.set(location);
        }
        fn is_moving(&self) -> bool {
            false
        }
    }

    fn display_at(phase: u8) -> MoonDisplay<InstantAxis, ()> {
        MoonDisplay::new(
            InstantAxis::default(),
            InstantAxis::default(),
            (),
            PhaseMap::new(),
            Phase::new(phase).unwrap(),
        )
    }

    /// Run until idle, collecting the phase after every call.
    fn run_to_rest(display: &mut MoonDisplay<InstantAxis, ()>) -> (Vec<u8>, Vec<u8>) {
        let mut shown = Vec::new();
        let mut arrivals = Vec::new();
        for _ in 0..200 {
            if let Some(phase) = display.run() {
                arrivals.push(phase.value());
            }
            shown.push(display.phase().value());
            if display.motion() == PhaseMotion::Idle {
                break;
            }
        }
        (shown, arrivals)
    }

    #[test]
    fn test_new_assumes_phase() {
        let display = display_at(14);
        let (pivot, leadscrew) = PhaseMap::new().positions(Phase::new(14).unwrap());
        assert_eq!(display.axis_position(AxisId::Pivot), pivot);
        assert_eq!(display.axis_position(AxisId::Leadscrew), leadscrew);
        assert_eq!(display.target(), display.phase());
    }

    #[test]
    fn test_single_step() {
        let mut display = display_at(3);
        display.show_phase(4).unwrap();

        assert_eq!(display.run(), None);
        assert_eq!(display.phase().value(), 4);
        assert_eq!(display.run().map(Phase::value), Some(4));
        assert_eq!(display.run(), None);
    }

    #[test]
    fn test_full_moon_reset_walks_through_zero() {
        let mut display = display_at(29);
        display.show_phase(30).unwrap();

        let (shown, arrivals) = run_to_rest(&mut display);
        assert!(shown.contains(&0));
        assert_eq!(shown.iter().filter(|&&p| p == 30).count(), 1);
        assert_eq!(arrivals, vec![30]);
        assert_eq!(display.phase(), Phase::FULL);
    }

    #[test]
    fn test_new_moon_reset_continues_to_target() {
        let mut display = display_at(59);
        display.show_phase(2).unwrap();

        let (_, arrivals) = run_to_rest(&mut display);
        // Reset ends at 30, relabelled 0 and reported, then two more steps
        assert_eq!(arrivals, vec![0, 2]);
        assert_eq!(display.phase().value(), 2);
    }

    #[test]
    fn test_same_phase_is_noop() {
        let mut display = display_at(12);
        display.show_phase(12).unwrap();
        assert_eq!(display.run(), None);
        assert_eq!(display.motion(), PhaseMotion::Idle);
    }

    #[test]
    fn test_turn_axis_keeps_location() {
        let mut display = display_at(0);
        let before = display.axis_position(AxisId::Leadscrew);
        display.turn_axis(AxisId::Leadscrew, 250);
        assert_eq!(display.axis_position(AxisId::Leadscrew), before);
    }
}
