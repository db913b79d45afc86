//! Unit types for physical quantities.
//!
//! Keeps pivot angles and channel speeds from being confused with raw step counts.

use core::ops::Neg;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Angular position in degrees.
///
/// Used for the pivot angle table. Converted to steps by [`crate::display::PhaseMap`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Degrees(pub f32);

impl Degrees {
    /// Create a new Degrees value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl Neg for Degrees {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

/// Channel speed in steps per second.
///
/// Zero is not a valid speed; [`StepsPerSec::new`] rejects it and the scheduler
/// substitutes [`StepsPerSec::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct StepsPerSec(u16);

impl StepsPerSec {
    /// 600 steps/s, comfortably inside what a 28BYJ-48 manages unloaded.
    pub const DEFAULT: Self = Self(600);

    /// Create a new speed with validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSpeed` for zero.
    pub fn new(value: u16) -> Result<Self, ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidSpeed(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Create a speed, substituting the default for zero.
    #[inline]
    pub const fn or_default(value: u16) -> Self {
        if value == 0 {
            Self::DEFAULT
        } else {
            Self(value)
        }
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Microseconds between steps at this speed.
    #[inline]
    pub const fn interval_us(self) -> u32 {
        1_000_000 / self.0 as u32
    }

    /// The fastest speed a scheduler ticking every `tick_interval_us` can service.
    ///
    /// A step interval equal to the tick only keeps pace through the jitter
    /// tolerance; configuration validation requires it to be strictly longer.
    #[inline]
    pub const fn max_for_tick(tick_interval_us: u32) -> Self {
        let max = if tick_interval_us == 0 {
            u16::MAX as u32
        } else {
            1_000_000 / tick_interval_us
        };
        if max == 0 {
            Self(1)
        } else if max > u16::MAX as u32 {
            Self(u16::MAX)
        } else {
            Self(max as u16)
        }
    }
}

impl Default for StepsPerSec {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u16> for StepsPerSec {
    type Error = ConfigError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for StepsPerSec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let value = u16::deserialize(deserializer)?;
        StepsPerSec::new(value).map_err(|e| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}
