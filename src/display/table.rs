//! Phase to axis position mapping.

use crate::config::units::Degrees;
use crate::config::MappingConfig;

use super::Phase;

/// Pivot angle per phase.
///
/// The two halves of the lunation use the same sweep, and each half is
/// mirror-symmetric about its quarter. Phases 0 and 30 sit at the same angle.
pub const PIVOT_ANGLES: [Degrees; 60] = {
    const HALF: [f32; 30] = [
        -78.0, -78.0, -75.5, -73.5, -71.0, -67.0, -63.0, -58.0, -53.0, -47.0,
        -40.0, -33.0, -25.0, -18.0, -10.0, 10.0, 18.0, 25.0, 33.0, 40.0,
        47.0, 53.0, 58.0, 63.0, 67.0, 71.0, 73.5, 75.5, 78.0, 78.0,
    ];
    let mut table = [Degrees(0.0); 60];
    let mut i = 0;
    while i < 60 {
        table[i] = Degrees(HALF[i % 30]);
        i += 1;
    }
    table
};

/// Pivot angle for `phase`.
#[inline]
pub fn angle_for_phase(phase: Phase) -> Degrees {
    PIVOT_ANGLES[phase.value() as usize]
}

/// Converts phases into pivot and leadscrew step locations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseMap {
    steps_per_degree: f32,
    leadscrew_base: f64,
    leadscrew_linear: f64,
    leadscrew_quadratic: f64,
    pivot_limit: i32,
}

impl PhaseMap {
    /// Mapping for the as-built display.
    pub fn new() -> Self {
        Self::from_config(&MappingConfig::default())
    }

    /// Mapping from calibration constants.
    pub fn from_config(config: &MappingConfig) -> Self {
        Self {
            steps_per_degree: config.steps_per_degree(),
            leadscrew_base: config.leadscrew_base,
            leadscrew_linear: config.leadscrew_linear,
            leadscrew_quadratic: config.leadscrew_quadratic,
            pivot_limit: config.pivot_limit.unsigned_abs().min(i32::MAX as u32) as i32,
        }
    }

    /// Pivot steps per degree.
    #[inline]
    pub fn steps_per_degree(&self) -> f32 {
        self.steps_per_degree
    }

    /// Pivot location for `angle`, rounded to the nearest step.
    pub fn pivot_steps(&self, angle: Degrees) -> i32 {
        libm::roundf(self.steps_per_degree * angle.value()) as i32
    }

    /// Leadscrew location that keeps the terminator in shape at pivot
    /// location `pivot`. Pivot locations beyond the fitted range are clamped.
    pub fn leadscrew_steps(&self, pivot: i32) -> i32 {
        let pv = f64::from(pivot.clamp(-self.pivot_limit, self.pivot_limit));
        let ls = self.leadscrew_base + self.leadscrew_linear * libm::fabs(pv)
            - self.leadscrew_quadratic * pv * pv;
        libm::round(ls) as i32
    }

    /// Unclamped pivot location for `phase`.
    #[inline]
    pub fn pivot_steps_for_phase(&self, phase: Phase) -> i32 {
        self.pivot_steps(angle_for_phase(phase))
    }

    /// `(pivot, leadscrew)` locations for `phase`.
    pub fn positions(&self, phase: Phase) -> (i32, i32) {
        let pivot = self.pivot_steps_for_phase(phase);
        (pivot, self.leadscrew_steps(pivot))
    }
}

impl Default for PhaseMap {
    fn default() -> Self {
        Self::new()
    }
}
