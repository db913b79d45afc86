//! Illumination configuration and ambient limits.

use serde::{Deserialize, Serialize};

/// Ambient light levels (0 dark .. 100 bright) between which the lamps ramp up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AmbientLimits {
    /// At or below this the lamps are off.
    pub lower: u8,

    /// At or above this the lamps are fully bright.
    pub upper: u8,
}

impl AmbientLimits {
    /// Create new ambient limits.
    pub const fn new(lower: u8, upper: u8) -> Self {
        Self { lower, upper }
    }

    /// Check if limits are valid (lower < upper <= 100).
    pub fn is_valid(&self) -> bool {
        self.lower < self.upper && self.upper <= 100
    }

    /// Brightness percentage for an ambient reading.
    ///
    /// Ramps linearly from 0 at `lower` to 100 at `upper`. Invalid limits give
    /// full brightness.
    pub fn brightness_for(&self, ambient: u8) -> u8 {
        if !self.is_valid() || ambient >= self.upper {
            return 100;
        }
        if ambient <= self.lower {
            return 0;
        }
        let span = u16::from(self.upper - self.lower);
        let above = u16::from(ambient - self.lower);
        (above * 100 / span) as u8
    }
}

impl Default for AmbientLimits {
    fn default() -> Self {
        Self { lower: 4, upper: 75 }
    }
}

/// Two-lamp illuminator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IlluminationConfig {
    /// Brightness in percent of the maximum duty.
    pub brightness: u8,

    /// Duty cycle of the waxing lamp at 100% brightness.
    pub waxing_max_duty: u16,

    /// Duty cycle of the waning lamp at 100% brightness.
    pub waning_max_duty: u16,

    /// Ambient range over which brightness ramps.
    pub ambient: AmbientLimits,
}

impl Default for IlluminationConfig {
    fn default() -> Self {
        Self {
            brightness: 100,
            waxing_max_duty: 255,
            waning_max_duty: 255,
            ambient: AmbientLimits::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambient_ramp() {
        let limits = AmbientLimits::new(10, 60);
        assert_eq!(limits.brightness_for(0), 0);
        assert_eq!(limits.brightness_for(10), 0);
        assert_eq!(limits.brightness_for(35), 50);
        assert_eq!(limits.brightness_for(60), 100);
        assert_eq!(limits.brightness_for(100), 100);
    }

    #[test]
    fn test_invalid_limits_are_fully_bright() {
        let limits = AmbientLimits::new(50, 50);
        assert!(!limits.is_valid());
        assert_eq!(limits.brightness_for(0), 100);
    }
}
