//! Per-channel motion state.
//!
//! Everything here is mutated only while the scheduler's lock is held, either
//! by a command from the main context or by the timer tick.

use embedded_hal::digital::OutputPin;

use crate::config::units::StepsPerSec;
use crate::error::MotorError;
use crate::motion::{Direction, StepTimer};

use super::coils::Coils;
use super::position::Position;

/// Handle to an allocated scheduler slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelId(pub(crate) u8);

impl ChannelId {
    /// Slot index in allocation order.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One scheduler slot.
pub(crate) struct ChannelState<P> {
    /// Coil outputs; `None` until the channel has been begun.
    pub(crate) coils: Option<Coils<P>>,
    pub(crate) position: Position,
    /// Signed steps still to take. Positive is clockwise.
    pub(crate) steps_remaining: i32,
    pub(crate) timer: StepTimer,
}

impl<P: OutputPin> ChannelState<P> {
    pub(crate) fn new(speed: StepsPerSec) -> Self {
        Self {
            coils: None,
            position: Position::default(),
            steps_remaining: 0,
            timer: StepTimer::new(speed),
        }
    }

    /// Replace the remaining step count. Starting from idle makes the first
    /// step due at the next tick; cancelling a move releases the coils at once.
    pub(crate) fn set_steps_remaining(&mut self, steps: i32) {
        if self.steps_remaining == 0 && steps != 0 {
            self.timer.restart();
        }
        let cancelled = self.steps_remaining != 0 && steps == 0;
        self.steps_remaining = steps;

        if cancelled {
            if let Some(coils) = self.coils.as_mut() {
                // Still marked energized on failure; the next idle tick retries
                let _ = coils.release();
            }
        }
    }

    pub(crate) fn drive(&mut self, steps: i32) {
        if steps != 0 {
            self.set_steps_remaining(self.steps_remaining.saturating_add(steps));
        }
    }

    pub(crate) fn drive_to(&mut self, location: i32) {
        let target = self.position.delta_to(location);
        self.set_steps_remaining(target);
    }

    /// Keep at most one more step in the current direction.
    pub(crate) fn stop(&mut self) {
        self.steps_remaining = self.steps_remaining.signum();
    }

    #[inline]
    pub(crate) fn is_moving(&self) -> bool {
        self.steps_remaining != 0
    }

    #[inline]
    pub(crate) fn is_energized(&self) -> bool {
        self.coils.as_ref().is_some_and(|c| c.is_energized())
    }

    /// Service this channel for one timer tick.
    ///
    /// An idle channel still holding its coils (a failed release) has them
    /// released again. A moving channel whose step is
    /// due takes exactly one half step; the last step of a move releases the
    /// coils instead of energizing the new pattern.
    pub(crate) fn service(&mut self, now_us: u32, max_jitter_us: u32) -> Result<(), MotorError> {
        let Some(coils) = self.coils.as_mut() else {
            return Ok(());
        };

        let Some(direction) = Direction::of(self.steps_remaining) else {
            return if coils.is_energized() {
                coils.release()
            } else {
                Ok(())
            };
        };

        if !self.timer.is_due(now_us, max_jitter_us) {
            return Ok(());
        }

        coils.advance(direction);
        self.position.step(direction);
        self.steps_remaining -= direction.sign();

        if self.steps_remaining == 0 {
            coils.release()
        } else {
            self.timer.advance(now_us);
            coils.energize()
        }
    }
}
