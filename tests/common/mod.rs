//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use moon_display::Scheduler;

/// Tick period used by the simulated timer.
pub const TICK_US: u32 = 500;

/// Output pin whose level can be observed through a clone.
#[derive(Clone, Default)]
pub struct TestPin {
    level: Arc<AtomicBool>,
    fail: Arc<AtomicBool>,
}

impl TestPin {
    pub fn is_high(&self) -> bool {
        self.level.load(Ordering::SeqCst)
    }

    /// Make every later write fail.
    pub fn break_pin(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Undo [`TestPin::break_pin`].
    pub fn repair_pin(&self) {
        self.fail.store(false, Ordering::SeqCst);
    }
}

impl ErrorType for TestPin {
    type Error = ErrorKind;
}

impl OutputPin for TestPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ErrorKind::Other);
        }
        self.level.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ErrorKind::Other);
        }
        self.level.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Four coil pins plus observers sharing their state.
pub fn coils() -> ([TestPin; 4], [TestPin; 4]) {
    let pins: [TestPin; 4] = Default::default();
    let observers = pins.clone();
    (pins, observers)
}

/// Levels of four observed pins, IN1 first.
pub fn levels(observers: &[TestPin; 4]) -> [bool; 4] {
    [
        observers[0].is_high(),
        observers[1].is_high(),
        observers[2].is_high(),
        observers[3].is_high(),
    ]
}

/// Simulated free-running microsecond clock.
pub struct Clock {
    pub now_us: u32,
}

impl Clock {
    pub fn new() -> Self {
        Self { now_us: 0 }
    }

    /// Advance one tick period and service the scheduler.
    pub fn tick<M: RawMutex, const N: usize>(&mut self, scheduler: &Scheduler<M, TestPin, N>) {
        self.now_us = self.now_us.wrapping_add(TICK_US);
        scheduler.tick(self.now_us).unwrap();
    }

    /// Tick until no channel has steps queued, then once more. Returns the
    /// number of ticks taken.
    pub fn run_until_idle<M: RawMutex, const N: usize>(
        &mut self,
        scheduler: &Scheduler<M, TestPin, N>,
        max_ticks: usize,
    ) -> usize {
        for n in 0..max_ticks {
            let moving = (0..scheduler.len())
                .filter_map(|i| scheduler.channel_id(i))
                .any(|id| scheduler.is_moving(id));
            if !moving {
                self.tick(scheduler);
                return n;
            }
            self.tick(scheduler);
        }
        panic!("scheduler still moving after {max_ticks} ticks");
    }
}
