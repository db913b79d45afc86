//! Persistent display record.
//!
//! The host stores this wherever it keeps non-volatile state and writes it
//! back whenever `MoonDisplay::run` reports an arrival, so a restart resumes
//! from the phase actually shown.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::config::AmbientLimits;
use crate::display::Phase;

/// POSIX TZ string used when none has been configured.
pub const DEFAULT_TIMEZONE: &str = "PST8PDT,M3.2.0,M11.1.0";

/// State that survives a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayRecord {
    /// Phase the display was last known to show.
    pub phase: Phase,

    /// POSIX TZ string for local time display.
    pub timezone: String<48>,

    /// Network name for time synchronisation.
    pub wifi_ssid: String<32>,

    /// Network password.
    pub wifi_password: String<32>,

    /// Follow manual `show` requests instead of the lunation clock.
    pub test_mode: bool,

    /// Ambient range over which the lamps ramp.
    pub ambient_limits: AmbientLimits,
}

impl DisplayRecord {
    /// Record the phase the display came to rest at. Returns `true` if it changed.
    pub fn update_phase(&mut self, phase: Phase) -> bool {
        let changed = self.phase != phase;
        self.phase = phase;
        changed
    }
}

impl Default for DisplayRecord {
    fn default() -> Self {
        Self {
            phase: Phase::NEW,
            timezone: String::try_from(DEFAULT_TIMEZONE).unwrap_or_default(),
            wifi_ssid: String::try_from("Set the SSID").unwrap_or_default(),
            wifi_password: String::try_from("Set the PW").unwrap_or_default(),
            test_mode: true,
            ambient_limits: AmbientLimits::default(),
        }
    }
}

#[cfg(feature = "std")]
mod io {
    use super::DisplayRecord;
    use crate::error::{ConfigError, Error, Result};

    impl DisplayRecord {
        /// Parse a record from TOML. Missing fields take their defaults.
        ///
        /// # Errors
        ///
        /// Returns `ConfigError::ParseError` for malformed TOML or an invalid phase.
        pub fn from_toml(content: &str) -> Result<Self> {
            toml::from_str(content).map_err(|e| {
                let msg = heapless::String::try_from(e.message()).unwrap_or_default();
                Error::Config(ConfigError::ParseError(msg))
            })
        }

        /// Serialize the record to TOML.
        ///
        /// # Errors
        ///
        /// Returns `ConfigError::ParseError` if serialization fails.
        pub fn to_toml(&self) -> Result<std::string::String> {
            toml::to_string(self).map_err(|e| {
                let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
                Error::Config(ConfigError::ParseError(msg))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let record = DisplayRecord::default();
        assert_eq!(record.phase, Phase::NEW);
        assert_eq!(record.timezone.as_str(), DEFAULT_TIMEZONE);
        assert!(record.test_mode);
        assert_eq!(record.ambient_limits, AmbientLimits::new(4, 75));
    }

    #[test]
    fn test_update_phase() {
        let mut record = DisplayRecord::default();
        assert!(record.update_phase(Phase::FULL));
        assert!(!record.update_phase(Phase::FULL));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_partial_toml() {
        let record = DisplayRecord::from_toml("phase = 17\ntest_mode = false\n").unwrap();
        assert_eq!(record.phase.value(), 17);
        assert!(!record.test_mode);
        assert_eq!(record.wifi_ssid.as_str(), "Set the SSID");
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_phase_out_of_range_rejected() {
        assert!(DisplayRecord::from_toml("phase = 60\n").is_err());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_saved_record_reloads() {
        let mut record = DisplayRecord::default();
        record.update_phase(Phase::new(44).unwrap());
        let text = record.to_toml().unwrap();
        assert_eq!(DisplayRecord::from_toml(&text).unwrap(), record);
    }
}
