//! Per-axis channel configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::units::StepsPerSec;

/// Configuration for one stepper channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxisConfig {
    /// Human-readable name (max 32 chars).
    #[serde(default)]
    pub name: String<32>,

    /// Constant stepping speed in steps per second.
    #[serde(default)]
    pub speed: StepsPerSec,

    /// Location modulus in steps; 0 for a linear axis.
    #[serde(default)]
    pub modulus: u32,
}

impl AxisConfig {
    /// Pivot defaults: linear, half the leadscrew's speed.
    pub fn pivot() -> Self {
        Self::named("pivot", 300)
    }

    /// Leadscrew defaults: linear, full speed.
    pub fn leadscrew() -> Self {
        Self::named("leadscrew", 600)
    }

    fn named(name: &str, speed: u16) -> Self {
        Self {
            name: String::try_from(name).unwrap_or_default(),
            speed: StepsPerSec::or_default(speed),
            modulus: 0,
        }
    }

    /// Whether the axis wraps around.
    #[inline]
    pub fn is_rotational(&self) -> bool {
        self.modulus != 0
    }
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            speed: StepsPerSec::DEFAULT,
            modulus: 0,
        }
    }
}

/// Timing of the shared step timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Interval between timer callbacks in microseconds.
    pub tick_interval_us: u32,

    /// How early (in microseconds) a step may be dispatched before it is due.
    pub max_jitter_us: u32,
}

impl SchedulerConfig {
    /// Default timer interval in microseconds.
    pub const DEFAULT_TICK_INTERVAL_US: u32 = 512;

    /// Default dispatch jitter tolerance in microseconds.
    pub const DEFAULT_MAX_JITTER_US: u32 = 75;

    /// Fastest channel speed this timing can service without missing steps.
    #[inline]
    pub fn max_speed(&self) -> StepsPerSec {
        StepsPerSec::max_for_tick(self.tick_interval_us)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_us: Self::DEFAULT_TICK_INTERVAL_US,
            max_jitter_us: Self::DEFAULT_MAX_JITTER_US,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_defaults() {
        let pivot = AxisConfig::pivot();
        assert_eq!(pivot.name.as_str(), "pivot");
        assert_eq!(pivot.speed.value(), 300);
        assert!(!pivot.is_rotational());

        let leadscrew = AxisConfig::leadscrew();
        assert_eq!(leadscrew.speed.value(), 600);
    }

    #[test]
    fn test_scheduler_max_speed() {
        let config = SchedulerConfig::default();
        assert_eq!(config.max_speed().value(), 1953);
    }
}
