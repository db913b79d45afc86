//! Motor module for moon-display.
//!
//! Provides the shared step scheduler, per-channel handles and the ULN2003
//! half-step coil driver.

mod builder;
mod channel;
pub mod coils;
mod position;
mod state;
mod system;

pub use builder::ChannelBuilder;
pub use channel::{Axis, Channel};
pub use coils::{Coils, HALF_STEP_SEQUENCE};
pub use position::Position;
pub use state::ChannelId;
pub use system::Scheduler;

/// Default number of scheduler slots.
pub const MAX_CHANNELS: usize = 4;

/// Half steps per output shaft revolution of a 28BYJ-48; the default modulus.
pub const DEFAULT_MODULUS: u32 = 4096;
