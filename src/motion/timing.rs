//! Constant-speed step timing.
//!
//! Timestamps are free-running `u32` microsecond counters; every comparison is
//! done on wrapping differences so the ~71 minute rollover is harmless.

use crate::config::units::StepsPerSec;

/// When the next step of one channel is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTimer {
    /// Configured speed.
    speed: StepsPerSec,

    /// Microseconds between steps at `speed`.
    interval_us: u32,

    /// Due time of the next step. `None` means due at the next tick.
    next_due: Option<u32>,
}

impl StepTimer {
    /// Create a timer stepping at `speed`.
    pub const fn new(speed: StepsPerSec) -> Self {
        Self {
            speed,
            interval_us: speed.interval_us(),
            next_due: None,
        }
    }

    /// Get the configured speed.
    #[inline]
    pub fn speed(&self) -> StepsPerSec {
        self.speed
    }

    /// Get the step interval in microseconds.
    #[inline]
    pub fn interval_us(&self) -> u32 {
        self.interval_us
    }

    /// Change the speed. Takes effect from the next scheduled step.
    pub fn set_speed(&mut self, speed: StepsPerSec) {
        self.speed = speed;
        self.interval_us = speed.interval_us();
    }

    /// Make the next step due immediately.
    #[inline]
    pub fn restart(&mut self) {
        self.next_due = None;
    }

    /// Check whether a step is due at `now_us`, allowing it to fire up to
    /// `jitter_us` early.
    #[inline]
    pub fn is_due(&self, now_us: u32, jitter_us: u32) -> bool {
        match self.next_due {
            None => true,
            Some(due) => (now_us.wrapping_sub(due.wrapping_sub(jitter_us)) as i32) >= 0,
        }
    }

    /// Schedule the step after the one just dispatched at `now_us`.
    ///
    /// The schedule advances from the previous due time, not from `now_us`.
    pub fn advance(&mut self, now_us: u32) {
        let base = self.next_due.unwrap_or(now_us);
        self.next_due = Some(base.wrapping_add(self.interval_us));
    }

    /// Due time of the next step, if one is scheduled.
    #[inline]
    pub fn next_due(&self) -> Option<u32> {
        self.next_due
    }
}

impl Default for StepTimer {
    fn default() -> Self {
        Self::new(StepsPerSec::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step_is_immediate() {
        let timer = StepTimer::default();
        assert!(timer.is_due(0, 0));
        assert!(timer.is_due(123_456, 75));
    }

    #[test]
    fn test_due_with_jitter() {
        let mut timer = StepTimer::new(StepsPerSec::or_default(1000));
        timer.advance(10_000);
        assert_eq!(timer.next_due(), Some(11_000));

        assert!(!timer.is_due(10_900, 75));
        assert!(timer.is_due(10_925, 75));
        assert!(timer.is_due(11_000, 75));
        assert!(timer.is_due(12_500, 75));
    }

    #[test]
    fn test_schedule_does_not_drift() {
        let mut timer = StepTimer::new(StepsPerSec::or_default(1000));
        timer.advance(0);
        // Dispatched late, but the next due time still follows the schedule
        timer.advance(1_400);
        assert_eq!(timer.next_due(), Some(2_000));
    }

    #[test]
    fn test_due_across_rollover() {
        let mut timer = StepTimer::new(StepsPerSec::or_default(1000));
        timer.advance(u32::MAX - 499);
        assert_eq!(timer.next_due(), Some(500));

        assert!(!timer.is_due(u32::MAX - 100, 0));
        assert!(timer.is_due(500, 0));
    }

    #[test]
    fn test_restart() {
        let mut timer = StepTimer::default();
        timer.advance(0);
        assert!(!timer.is_due(1, 0));
        timer.restart();
        assert!(timer.is_due(1, 0));
    }
}
