//! Lunation clock: which display phase the real moon is in.
//!
//! Ages are measured from a known new moon using the mean synodic month.
//! Integer milliseconds keep the phase in 0..=59 at every instant.

use crate::display::{Phase, PHASE_COUNT};

/// New moon of 2024-07-05 22:57:00 UTC, as Unix seconds.
pub const REFERENCE_NEW_MOON: i64 = 1_720_220_220;

/// Mean synodic month, 29.53059 days, in milliseconds.
pub const LUNAR_MONTH_MS: u64 = 2_551_442_976;

/// Milliseconds since the most recent new moon at `unix_secs`.
///
/// Times before the reference new moon are handled as well.
pub fn moon_age_ms(unix_secs: i64) -> u64 {
    let since = (i128::from(unix_secs) - i128::from(REFERENCE_NEW_MOON)) * 1000;
    since.rem_euclid(i128::from(LUNAR_MONTH_MS)) as u64
}

/// Seconds since the most recent new moon at `unix_secs`.
pub fn moon_age_secs(unix_secs: i64) -> u64 {
    moon_age_ms(unix_secs) / 1000
}

/// Display phase of the moon at `unix_secs`.
pub fn phase_at(unix_secs: i64) -> Phase {
    let phase = moon_age_ms(unix_secs) * u64::from(PHASE_COUNT) / LUNAR_MONTH_MS;
    Phase::new(phase as u8).unwrap_or(Phase::NEW)
}

/// Milliseconds from `unix_secs` until the moon enters the next display phase.
pub fn millis_until_next_phase(unix_secs: i64) -> u64 {
    let age = moon_age_ms(unix_secs);
    let phase = age * u64::from(PHASE_COUNT) / LUNAR_MONTH_MS;
    let next_start = ((phase + 1) * LUNAR_MONTH_MS).div_ceil(u64::from(PHASE_COUNT));
    next_start - age
}
