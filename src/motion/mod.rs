//! Motion module for moon-display.
//!
//! Provides step direction and constant-speed step timing.

mod timing;

pub use timing::StepTimer;

/// Direction of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Location increases.
    Clockwise,
    /// Location decreases.
    CounterClockwise,
}

impl Direction {
    /// Direction of travel for a signed step count, or `None` when there is nothing to do.
    #[inline]
    pub fn of(steps: i32) -> Option<Self> {
        match steps {
            0 => None,
            s if s > 0 => Some(Direction::Clockwise),
            _ => Some(Direction::CounterClockwise),
        }
    }

    /// +1 or -1.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_of_steps() {
        assert_eq!(Direction::of(0), None);
        assert_eq!(Direction::of(12), Some(Direction::Clockwise));
        assert_eq!(Direction::of(-1), Some(Direction::CounterClockwise));
        assert_eq!(Direction::CounterClockwise.sign(), -1);
    }
}
