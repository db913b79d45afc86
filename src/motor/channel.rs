//! Per-channel handle over a shared [`Scheduler`].

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::OutputPin;

use super::state::ChannelId;
use super::system::Scheduler;

/// Motion operations the display controller needs from an axis.
///
/// Implemented by [`Channel`]; tests and simulations may provide their own.
pub trait Axis {
    /// Queue `steps` more relative steps.
    fn drive(&self, steps: i32);

    /// Replace the queued motion with a move to `location`.
    fn drive_to(&self, location: i32);

    /// Cut the queued motion to at most one step.
    fn stop(&self);

    /// Current location in steps.
    fn location(&self) -> i32;

    /// Redefine the current location without moving.
    fn set_location(&self, location: i32);

    /// Whether steps are still queued.
    fn is_moving(&self) -> bool;
}

/// Handle to one scheduler channel.
///
/// Cheap to copy; every operation locks the scheduler for its duration only.
pub struct Channel<'a, M: RawMutex, P, const N: usize> {
    scheduler: &'a Scheduler<M, P, N>,
    id: ChannelId,
}

impl<M: RawMutex, P, const N: usize> Clone for Channel<'_, M, P, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: RawMutex, P, const N: usize> Copy for Channel<'_, M, P, N> {}

impl<'a, M: RawMutex, P: OutputPin, const N: usize> Channel<'a, M, P, N> {
    pub(crate) fn new(scheduler: &'a Scheduler<M, P, N>, id: ChannelId) -> Self {
        Self { scheduler, id }
    }

    /// Scheduler slot of this channel.
    #[inline]
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// The scheduler this channel belongs to.
    #[inline]
    pub fn scheduler(&self) -> &'a Scheduler<M, P, N> {
        self.scheduler
    }

    /// See [`Scheduler::drive`].
    pub fn drive(&self, steps: i32) {
        self.scheduler.drive(self.id, steps)
    }

    /// See [`Scheduler::drive_to`].
    pub fn drive_to(&self, location: i32) {
        self.scheduler.drive_to(self.id, location)
    }

    /// See [`Scheduler::stop`].
    pub fn stop(&self) {
        self.scheduler.stop(self.id)
    }

    /// Current location in steps.
    pub fn location(&self) -> i32 {
        self.scheduler.location(self.id)
    }

    /// Redefine the current location.
    pub fn set_location(&self, location: i32) {
        self.scheduler.set_location(self.id, location)
    }

    /// Wrap modulus; 0 for a linear channel.
    pub fn modulus(&self) -> u32 {
        self.scheduler.modulus(self.id)
    }

    /// Change the wrap modulus.
    pub fn set_modulus(&self, modulus: u32) {
        self.scheduler.set_modulus(self.id, modulus)
    }

    /// Speed in steps per second.
    pub fn speed(&self) -> u16 {
        self.scheduler.speed(self.id)
    }

    /// See [`Scheduler::set_speed`].
    pub fn set_speed(&self, steps_per_sec: u16) {
        self.scheduler.set_speed(self.id, steps_per_sec)
    }

    /// Signed steps still queued.
    pub fn steps_remaining(&self) -> i32 {
        self.scheduler.steps_remaining(self.id)
    }

    /// Whether steps are still queued.
    pub fn is_moving(&self) -> bool {
        self.scheduler.is_moving(self.id)
    }

    /// Whether the coils are powered.
    pub fn is_energized(&self) -> bool {
        self.scheduler.is_energized(self.id)
    }

    /// Busy-wait until the queued motion has been dispatched.
    ///
    /// Only useful when ticks arrive from an interrupt or another thread;
    /// called from the ticking context it never returns.
    pub fn spin_until_idle(&self) {
        while self.is_moving() {
            core::hint::spin_loop();
        }
    }
}

impl<M: RawMutex, P: OutputPin, const N: usize> Axis for Channel<'_, M, P, N> {
    fn drive(&self, steps: i32) {
        Channel::drive(self, steps)
    }

    fn drive_to(&self, location: i32) {
        Channel::drive_to(self, location)
    }

    fn stop(&self) {
        Channel::stop(self)
    }

    fn location(&self) -> i32 {
        Channel::location(self)
    }

    fn set_location(&self, location: i32) {
        Channel::set_location(self, location)
    }

    fn is_moving(&self) -> bool {
        Channel::is_moving(self)
    }
}

impl<A: Axis + ?Sized> Axis for &A {
    fn drive(&self, steps: i32) {
        (**self).drive(steps)
    }

    fn drive_to(&self, location: i32) {
        (**self).drive_to(location)
    }

    fn stop(&self) {
        (**self).stop()
    }

    fn location(&self) -> i32 {
        (**self).location()
    }

    fn set_location(&self, location: i32) {
        (**self).set_location(location)
    }

    fn is_moving(&self) -> bool {
        (**self).is_moving()
    }
}
