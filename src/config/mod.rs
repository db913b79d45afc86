//! Configuration module for moon-display.
//!
//! Provides types for loading and validating the scheduler, axis, mapping and
//! illumination settings from TOML files (with `std` feature) or pre-parsed data.

mod axis;
mod illumination;
mod mapping;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::{AxisConfig, SchedulerConfig};
pub use illumination::{AmbientLimits, IlluminationConfig};
pub use mapping::MappingConfig;
pub use system::DisplayConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, StepsPerSec};
