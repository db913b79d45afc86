//! Display configuration - root configuration structure.

use serde::Deserialize;

use super::axis::{AxisConfig, SchedulerConfig};
use super::illumination::IlluminationConfig;
use super::mapping::MappingConfig;

/// Root configuration structure from TOML.
///
/// Every section is optional; an empty document yields the as-built defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DisplayConfig {
    /// Shared step timer.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Pivot channel.
    #[serde(default = "AxisConfig::pivot")]
    pub pivot: AxisConfig,

    /// Leadscrew channel.
    #[serde(default = "AxisConfig::leadscrew")]
    pub leadscrew: AxisConfig,

    /// Phase-to-position calibration.
    #[serde(default)]
    pub mapping: MappingConfig,

    /// Lamp settings.
    #[serde(default)]
    pub illumination: IlluminationConfig,
}

impl DisplayConfig {
    /// Get an axis configuration by name.
    pub fn axis(&self, name: &str) -> Option<&AxisConfig> {
        [&self.pivot, &self.leadscrew]
            .into_iter()
            .find(|axis| axis.name.as_str() == name)
    }

    /// Both axis configurations, pivot first.
    pub fn axes(&self) -> [&AxisConfig; 2] {
        [&self.pivot, &self.leadscrew]
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            pivot: AxisConfig::pivot(),
            leadscrew: AxisConfig::leadscrew(),
            mapping: MappingConfig::default(),
            illumination: IlluminationConfig::default(),
        }
    }
}
