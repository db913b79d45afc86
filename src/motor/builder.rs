//! Builder pattern for scheduler channels.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::OutputPin;

use crate::config::AxisConfig;
use crate::error::{ConfigError, Error, Result};

use super::channel::Channel;
use super::system::Scheduler;

/// Builder for allocating and configuring a [`Channel`].
pub struct ChannelBuilder<'a, M: RawMutex, P, const N: usize> {
    scheduler: &'a Scheduler<M, P, N>,
    coils: Option<[P; 4]>,
    speed: Option<u16>,
    modulus: Option<u32>,
    location: Option<i32>,
}

impl<'a, M: RawMutex, P: OutputPin, const N: usize> ChannelBuilder<'a, M, P, N> {
    /// Create a new builder on `scheduler`.
    pub fn new(scheduler: &'a Scheduler<M, P, N>) -> Self {
        Self {
            scheduler,
            coils: None,
            speed: None,
            modulus: None,
            location: None,
        }
    }

    /// Set the coil outputs, IN1..IN4 (required).
    pub fn coils(mut self, coils: [P; 4]) -> Self {
        self.coils = Some(coils);
        self
    }

    /// Set the speed in steps per second.
    pub fn speed(mut self, steps_per_sec: u16) -> Self {
        self.speed = Some(steps_per_sec);
        self
    }

    /// Set the location modulus; 0 for a linear channel.
    pub fn modulus(mut self, modulus: u32) -> Self {
        self.modulus = Some(modulus);
        self
    }

    /// Set the starting location.
    pub fn location(mut self, location: i32) -> Self {
        self.location = Some(location);
        self
    }

    /// Apply speed and modulus from an axis configuration.
    pub fn from_axis_config(self, config: &AxisConfig) -> Self {
        self.speed(config.speed.value()).modulus(config.modulus)
    }

    /// Allocate a slot, bind the coils and apply the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if coils were not provided, the scheduler is full or
    /// the coils cannot be released.
    pub fn build(self) -> Result<Channel<'a, M, P, N>> {
        let coils = self.coils.ok_or(Error::Config(ConfigError::MissingCoils))?;

        let id = self.scheduler.allocate()?;
        self.scheduler.begin(id, coils)?;

        let channel = self.scheduler.channel(id);
        if let Some(modulus) = self.modulus {
            channel.set_modulus(modulus);
        }
        if let Some(speed) = self.speed {
            channel.set_speed(speed);
        }
        if let Some(location) = self.location {
            channel.set_location(location);
        }

        Ok(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[test]
    fn test_builder_missing_coils() {
        let scheduler: Scheduler<NoopRawMutex, PinMock> = Scheduler::new();
        let result = scheduler.builder().speed(300).build();

        assert!(matches!(result, Err(Error::Config(ConfigError::MissingCoils))));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_builder_from_axis_config() {
        let scheduler: Scheduler<NoopRawMutex, PinMock> = Scheduler::new();
        let pins: [PinMock; 4] = core::array::from_fn(|_| PinMock::new(&[Transaction::set(State::Low)]));
        let mut checks = pins.clone();

        let channel = scheduler
            .builder()
            .coils(pins)
            .from_axis_config(&AxisConfig::pivot())
            .location(-1560)
            .build()
            .unwrap();

        assert_eq!(channel.id().index(), 0);
        assert_eq!(channel.speed(), 300);
        assert_eq!(channel.modulus(), 0);
        assert_eq!(channel.location(), -1560);

        for pin in checks.iter_mut() {
            pin.done();
        }
    }
}
