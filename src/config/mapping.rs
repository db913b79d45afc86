//! Phase-to-position mapping constants.
//!
//! The leadscrew fit comes from calibration runs of the as-built mechanism:
//! `ls = base + linear * |pv| - quadratic * pv^2`, valid for `|pv| <= pivot_limit`.

use serde::Deserialize;

/// Calibration constants for the pivot and leadscrew mapping.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Pivot motor steps per output shaft revolution.
    pub steps_per_revolution: u32,

    /// Pivot gear ratio (output:input).
    pub gear_ratio: f32,

    /// Leadscrew position at pivot 0.
    pub leadscrew_base: f64,

    /// Leadscrew steps per pivot step.
    pub leadscrew_linear: f64,

    /// Leadscrew steps per pivot step squared (subtracted).
    pub leadscrew_quadratic: f64,

    /// Largest pivot excursion, in steps, over which the fit holds.
    pub pivot_limit: i32,
}

impl MappingConfig {
    /// Pivot steps per degree of pivot rotation.
    #[inline]
    pub fn steps_per_degree(&self) -> f32 {
        self.steps_per_revolution as f32 * self.gear_ratio / 360.0
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            steps_per_revolution: 4096,
            gear_ratio: 1.8,
            leadscrew_base: 497_671.0,
            leadscrew_linear: 30.5,
            leadscrew_quadratic: 0.201,
            pivot_limit: 1600,
        }
    }
}
