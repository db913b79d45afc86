//! Interrupt-driven step scheduler for up to `N` channels.
//!
//! The main context issues motion commands while a periodic timer calls
//! [`Scheduler::tick`]. Both sides go through the same blocking mutex, so a
//! command never observes a half-dispatched step and the tick never observes a
//! half-applied command.
//!
//! # Example
//!
//! ```rust,ignore
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use moon_display::motor::Scheduler;
//!
//! static SCHEDULER: Scheduler<CriticalSectionRawMutex, Pin> = Scheduler::new();
//!
//! let pivot = SCHEDULER.builder().coils(pins).speed(300).modulus(0).build()?;
//! pivot.drive_to(1597);
//!
//! // From the timer interrupt, every 512 us:
//! SCHEDULER.tick(now_us)?;
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::digital::OutputPin;
use heapless::Vec;

use crate::config::units::StepsPerSec;
use crate::config::SchedulerConfig;
use crate::error::{ConfigError, Error, MotorError, Result};

use super::builder::ChannelBuilder;
use super::channel::Channel;
use super::coils::Coils;
use super::state::{ChannelId, ChannelState};
use super::MAX_CHANNELS;

/// Shared step scheduler.
///
/// `M` selects the lock: `CriticalSectionRawMutex` when ticks come from an
/// interrupt, `NoopRawMutex` when everything runs in one context.
pub struct Scheduler<M: RawMutex, P, const N: usize = MAX_CHANNELS> {
    channels: Mutex<M, RefCell<Vec<ChannelState<P>, N>>>,
    tick_interval_us: u32,
    max_jitter_us: u32,
}

impl<M: RawMutex, P: OutputPin, const N: usize> Scheduler<M, P, N> {
    /// Create a scheduler with the default 512 µs tick and 75 µs jitter tolerance.
    pub const fn new() -> Self {
        Self::with_timing(
            SchedulerConfig::DEFAULT_TICK_INTERVAL_US,
            SchedulerConfig::DEFAULT_MAX_JITTER_US,
        )
    }

    /// Create a scheduler for a timer firing every `tick_interval_us`.
    pub const fn with_timing(tick_interval_us: u32, max_jitter_us: u32) -> Self {
        Self {
            channels: Mutex::new(RefCell::new(Vec::new())),
            tick_interval_us,
            max_jitter_us,
        }
    }

    /// Create a scheduler from configuration.
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::with_timing(config.tick_interval_us, config.max_jitter_us)
    }

    /// Number of slots.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of allocated channels.
    pub fn len(&self) -> usize {
        self.channels.lock(|channels| channels.borrow().len())
    }

    /// Whether no channel has been allocated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Timer interval this scheduler was configured for.
    #[inline]
    pub fn tick_interval_us(&self) -> u32 {
        self.tick_interval_us
    }

    /// How early a step may be dispatched.
    #[inline]
    pub fn max_jitter_us(&self) -> u32 {
        self.max_jitter_us
    }

    /// Fastest speed the tick interval can service; faster requests are clamped.
    #[inline]
    pub fn max_speed(&self) -> StepsPerSec {
        StepsPerSec::max_for_tick(self.tick_interval_us)
    }

    /// Reserve the next free slot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TooManyChannels` when all `N` slots are taken.
    pub fn allocate(&self) -> Result<ChannelId> {
        let initial = self.clamp_speed(StepsPerSec::DEFAULT.value());
        self.channels.lock(|channels| {
            let mut channels = channels.borrow_mut();
            let id = ChannelId(channels.len() as u8);
            channels.push(ChannelState::new(initial)).map_err(|_| {
                #[cfg(feature = "defmt")]
                defmt::error!("scheduler full ({} channels)", N);
                Error::Config(ConfigError::TooManyChannels { capacity: N })
            })?;
            Ok(id)
        })
    }

    /// Look up the id of an allocated slot by index.
    pub fn channel_id(&self, index: usize) -> Option<ChannelId> {
        (index < self.len()).then_some(ChannelId(index as u8))
    }

    /// Bind coil outputs to a slot and reset it: location 0, modulus 4096,
    /// default speed, winding 0, nothing queued. The coils are driven low.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::UnknownChannel` for an unallocated id and
    /// `MotorError::PinError` if the coils cannot be written.
    pub fn begin(&self, id: ChannelId, coils: [P; 4]) -> Result<()> {
        let speed = self.clamp_speed(StepsPerSec::DEFAULT.value());
        self.channels.lock(|channels| {
            let mut channels = channels.borrow_mut();
            let slot = channels
                .get_mut(id.index())
                .ok_or(Error::Motor(MotorError::UnknownChannel(id.0)))?;

            *slot = ChannelState::new(speed);
            let mut coils = Coils::new(coils);
            let released = coils.release();
            slot.coils = Some(coils);

            #[cfg(feature = "defmt")]
            defmt::debug!("channel {} begun", id.0);

            released.map_err(Error::from)
        })
    }

    /// Start building a channel on the next free slot.
    pub fn builder(&self) -> ChannelBuilder<'_, M, P, N> {
        ChannelBuilder::new(self)
    }

    /// Handle for an allocated channel.
    pub fn channel(&self, id: ChannelId) -> Channel<'_, M, P, N> {
        Channel::new(self, id)
    }

    /// Queue `steps` more steps relative to whatever is already queued.
    /// Positive is clockwise. Zero is a no-op.
    ///
    /// Cancelling a move this way (or with [`Scheduler::drive_to`]) releases
    /// the coils before returning.
    pub fn drive(&self, id: ChannelId, steps: i32) {
        self.with_channel(id, |channel| channel.drive(steps));
    }

    /// Replace the queued motion with a move to `location`, taking the
    /// shortest way round on a rotational channel.
    pub fn drive_to(&self, id: ChannelId, location: i32) {
        self.with_channel(id, |channel| channel.drive_to(location));
    }

    /// Reduce the queued motion to at most one step in its current direction.
    pub fn stop(&self, id: ChannelId) {
        self.with_channel(id, |channel| channel.stop());
    }

    /// Current location in steps.
    pub fn location(&self, id: ChannelId) -> i32 {
        self.with_channel(id, |channel| channel.position.location())
            .unwrap_or(0)
    }

    /// Redefine the current location without moving.
    pub fn set_location(&self, id: ChannelId, location: i32) {
        self.with_channel(id, |channel| channel.position.set_location(location));
    }

    /// Wrap modulus; 0 for a linear channel.
    pub fn modulus(&self, id: ChannelId) -> u32 {
        self.with_channel(id, |channel| channel.position.modulus())
            .unwrap_or(0)
    }

    /// Change the wrap modulus and re-wrap the current location.
    pub fn set_modulus(&self, id: ChannelId, modulus: u32) {
        self.with_channel(id, |channel| channel.position.set_modulus(modulus));
    }

    /// Speed in steps per second.
    pub fn speed(&self, id: ChannelId) -> u16 {
        self.with_channel(id, |channel| channel.timer.speed().value())
            .unwrap_or(0)
    }

    /// Set the stepping speed. Zero selects the default; values above
    /// [`Scheduler::max_speed`] are clamped.
    pub fn set_speed(&self, id: ChannelId, steps_per_sec: u16) {
        let speed = self.clamp_speed(steps_per_sec);
        self.with_channel(id, |channel| channel.timer.set_speed(speed));
    }

    /// Signed steps still queued.
    pub fn steps_remaining(&self, id: ChannelId) -> i32 {
        self.with_channel(id, |channel| channel.steps_remaining)
            .unwrap_or(0)
    }

    /// Whether the channel has steps queued.
    pub fn is_moving(&self, id: ChannelId) -> bool {
        self.with_channel(id, |channel| channel.is_moving())
            .unwrap_or(false)
    }

    /// Whether the channel's coils are powered.
    pub fn is_energized(&self, id: ChannelId) -> bool {
        self.with_channel(id, |channel| channel.is_energized())
            .unwrap_or(false)
    }

    /// Service every channel once. Call from the periodic timer with a
    /// free-running microsecond timestamp.
    ///
    /// Channels are serviced in allocation order. A failing coil write does
    /// not stop the other channels from being serviced.
    ///
    /// # Errors
    ///
    /// Returns the first `MotorError::PinError` encountered.
    pub fn tick(&self, now_us: u32) -> Result<()> {
        self.channels.lock(|channels| {
            let mut channels = channels.borrow_mut();
            let mut outcome = Ok(());
            for channel in channels.iter_mut() {
                if let Err(e) = channel.service(now_us, self.max_jitter_us) {
                    if outcome.is_ok() {
                        outcome = Err(Error::Motor(e));
                    }
                }
            }
            outcome
        })
    }

    fn with_channel<R>(&self, id: ChannelId, f: impl FnOnce(&mut ChannelState<P>) -> R) -> Option<R> {
        self.channels
            .lock(|channels| channels.borrow_mut().get_mut(id.index()).map(f))
    }

    fn clamp_speed(&self, steps_per_sec: u16) -> StepsPerSec {
        StepsPerSec::or_default(steps_per_sec).min(self.max_speed())
    }
}

impl<M: RawMutex, P: OutputPin, const N: usize> Default for Scheduler<M, P, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    type TestScheduler<const N: usize> = Scheduler<NoopRawMutex, PinMock, N>;

    fn released_pins() -> [PinMock; 4] {
        core::array::from_fn(|_| PinMock::new(&[Transaction::set(State::Low)]))
    }

    #[test]
    fn test_allocate_until_full() {
        let scheduler = TestScheduler::<2>::new();
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.allocate().unwrap().index(), 0);
        assert_eq!(scheduler.allocate().unwrap().index(), 1);

        let result = scheduler.allocate();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::TooManyChannels { capacity: 2 }))
        ));
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_begin_resets_and_releases() {
        let scheduler = TestScheduler::<4>::new();
        let id = scheduler.allocate().unwrap();

        let pins = released_pins();
        let mut checks = pins.clone();
        scheduler.begin(id, pins).unwrap();

        assert_eq!(scheduler.location(id), 0);
        assert_eq!(scheduler.modulus(id), 4096);
        assert_eq!(scheduler.speed(id), 600);
        assert!(!scheduler.is_moving(id));
        assert!(!scheduler.is_energized(id));

        for pin in checks.iter_mut() {
            pin.done();
        }
    }

    #[test]
    fn test_unknown_channel_is_inert() {
        let scheduler = TestScheduler::<4>::new();
        let stray = ChannelId(3);

        scheduler.drive(stray, 100);
        scheduler.set_location(stray, 5);
        assert_eq!(scheduler.location(stray), 0);
        assert!(!scheduler.is_moving(stray));
        assert!(scheduler.channel_id(0).is_none());

        let pins: [PinMock; 4] = core::array::from_fn(|_| PinMock::new(&[]));
        let mut checks = pins.clone();
        assert!(matches!(
            scheduler.begin(stray, pins),
            Err(Error::Motor(MotorError::UnknownChannel(3)))
        ));

        for pin in checks.iter_mut() {
            pin.done();
        }
    }

    #[test]
    fn test_speed_is_clamped_and_zero_defaults() {
        let scheduler = TestScheduler::<4>::new();
        let id = scheduler.allocate().unwrap();

        scheduler.set_speed(id, 5000);
        assert_eq!(scheduler.speed(id), 1953);

        scheduler.set_speed(id, 0);
        assert_eq!(scheduler.speed(id), 600);
    }

    #[test]
    fn test_drive_to_uses_modulus() {
        let scheduler = TestScheduler::<4>::new();
        let id = scheduler.allocate().unwrap();

        scheduler.set_location(id, 4000);
        scheduler.drive_to(id, 100);
        assert_eq!(scheduler.steps_remaining(id), 196);

        scheduler.set_modulus(id, 0);
        scheduler.drive_to(id, 100);
        assert_eq!(scheduler.steps_remaining(id), -3900);
    }
}
