//! # moon-display
//!
//! Firmware core for a mechanical moon phase display driven by two 28BYJ-48
//! steppers through ULN2003 drivers, with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Interrupt-driven stepping**: One shared scheduler services up to four
//!   half-step channels from a periodic timer
//! - **embedded-hal 1.0**: Uses `OutputPin` for coils, `SetDutyCycle` for lamps
//! - **no_std compatible**: Core library works without standard library
//! - **Phase controller**: 60-phase lunation with automatic reset maneuvers at
//!   new and full moon
//! - **Configuration-driven**: Timing, speeds, calibration and lamps in TOML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use moon_display::{lunation, MoonDisplay, PhaseMap, Scheduler};
//!
//! static SCHEDULER: Scheduler<CriticalSectionRawMutex, Pin> = Scheduler::new();
//!
//! let config = moon_display::load_config("display.toml")?;
//! let pivot = SCHEDULER.builder().coils(pivot_pins).from_axis_config(&config.pivot).build()?;
//! let leadscrew = SCHEDULER.builder().coils(ls_pins).from_axis_config(&config.leadscrew).build()?;
//!
//! let map = PhaseMap::from_config(&config.mapping);
//! let mut display = MoonDisplay::new(pivot, leadscrew, (), map, record.phase);
//! display.show_phase(lunation::phase_at(now).value().into())?;
//!
//! // Timer interrupt: SCHEDULER.tick(now_us)
//! // Main loop:       display.run()
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod config;
pub mod display;
pub mod error;
pub mod illumination;
pub mod lunation;
pub mod motion;
pub mod motor;
pub mod persist;

// Re-exports for ergonomic API
pub use config::{validate_config, AxisConfig, DisplayConfig, MappingConfig, SchedulerConfig};
pub use display::{AxisId, MoonDisplay, Phase, PhaseMap, PhaseMotion};
pub use error::{Error, Result};
pub use illumination::{Illumination, Illuminator};
pub use motion::Direction;
pub use motor::{Axis, Channel, ChannelBuilder, ChannelId, Scheduler};
pub use persist::DisplayRecord;

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Degrees, StepsPerSec};
