//! Location tracking for a stepper channel.
//!
//! Locations are signed step counts. A non-zero modulus turns the axis into a
//! rotational one whose location is kept in `[0, modulus)`.

use crate::motion::Direction;

/// Channel location with optional wrap-around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    /// Current location in steps.
    location: i32,
    /// Wrap modulus; 0 means unbounded.
    modulus: u32,
}

impl Position {
    /// Create a position at location 0.
    #[inline]
    pub const fn new(modulus: u32) -> Self {
        Self {
            location: 0,
            modulus: clamp_modulus(modulus),
        }
    }

    /// Get the current location.
    #[inline]
    pub fn location(&self) -> i32 {
        self.location
    }

    /// Get the wrap modulus (0 for a linear axis).
    #[inline]
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// Redefine the current location, wrapping it into range.
    #[inline]
    pub fn set_location(&mut self, location: i32) {
        self.location = self.wrap(location as i64);
    }

    /// Change the modulus and re-wrap the current location.
    pub fn set_modulus(&mut self, modulus: u32) {
        self.modulus = clamp_modulus(modulus);
        self.location = self.wrap(self.location as i64);
    }

    /// Record one step in `direction`.
    #[inline]
    pub fn step(&mut self, direction: Direction) {
        if self.modulus == 0 {
            self.location = self.location.wrapping_add(direction.sign());
        } else {
            self.location = self.wrap(self.location as i64 + direction.sign() as i64);
        }
    }

    /// Signed step count that brings the location to `target`.
    ///
    /// On a rotational axis this is the shortest way round, in `(-m/2, m/2]`.
    pub fn delta_to(&self, target: i32) -> i32 {
        let raw = target as i64 - self.location as i64;
        if self.modulus == 0 {
            return raw.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        }

        let m = self.modulus as i64;
        let forward = raw.rem_euclid(m);
        let delta = if forward > m / 2 { forward - m } else { forward };
        delta as i32
    }

    fn wrap(&self, location: i64) -> i32 {
        if self.modulus == 0 {
            location.clamp(i32::MIN as i64, i32::MAX as i64) as i32
        } else {
            location.rem_euclid(self.modulus as i64) as i32
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(super::DEFAULT_MODULUS)
    }
}

// Locations are i32, so a modulus beyond i32::MAX cannot be represented.
const fn clamp_modulus(modulus: u32) -> u32 {
    if modulus > i32::MAX as u32 {
        i32::MAX as u32
    } else {
        modulus
    }
}
