//! Error types for moon-display.
//!
//! Provides unified error handling across configuration, channel control and phase requests.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all moon-display operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Channel or coil operation error
    Motor(MotorError),
    /// Rejected display request
    Display(DisplayError),
}

/// Configuration-related errors.
///
/// These are startup errors: a host that gets one must not continue running the display.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Every channel slot of the scheduler is already allocated
    TooManyChannels {
        /// Number of slots the scheduler was built with
        capacity: usize,
    },
    /// A channel was built without its four coil outputs
    MissingCoils,
    /// Invalid channel speed (must be > 0)
    InvalidSpeed(u16),
    /// Channel speed is faster than the tick interval can service
    TickTooSlow {
        /// Configured tick interval in microseconds
        tick_interval_us: u32,
        /// Step interval of the offending channel in microseconds
        step_interval_us: u32,
    },
    /// Tick interval is zero or the jitter tolerance is not below it
    InvalidTiming {
        /// Configured tick interval in microseconds
        tick_interval_us: u32,
        /// Configured jitter tolerance in microseconds
        max_jitter_us: u32,
    },
    /// Invalid pivot gear ratio (must be > 0)
    InvalidGearRatio(f32),
    /// Invalid steps per revolution (must be > 0)
    InvalidStepsPerRevolution(u32),
    /// A phase maps to a pivot position outside the leadscrew fit's valid range
    PivotOutOfRange {
        /// Phase whose angle is out of range
        phase: u8,
        /// Pivot position in steps
        steps: i32,
        /// Configured pivot limit in steps
        limit: i32,
    },
    /// A leadscrew fit coefficient is not a finite number
    InvalidCoefficient(&'static str),
    /// Invalid brightness percentage (must be 0-100)
    InvalidBrightness(u8),
    /// Invalid ambient limits (lower must be < upper <= 100)
    InvalidAmbientLimits {
        /// Lower ambient limit
        lower: u8,
        /// Upper ambient limit
        upper: u8,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Channel and coil errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Coil output operation failed
    PinError,
    /// Lamp PWM rejected a duty cycle
    LampError,
    /// The channel index does not name an allocated slot
    UnknownChannel(u8),
}

/// Display request errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Requested phase is outside 0..=59
    PhaseOutOfRange(i32),
    /// Display is moving or resetting; the request was not queued
    Busy,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Display(e) => write!(f, "Display error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::TooManyChannels { capacity } => {
                write!(f, "Too many channels; the scheduler holds at most {}", capacity)
            }
            ConfigError::MissingCoils => write!(f, "Channel has no coil outputs"),
            ConfigError::InvalidSpeed(v) => write!(f, "Invalid speed: {}. Must be > 0", v),
            ConfigError::TickTooSlow { tick_interval_us, step_interval_us } => write!(
                f,
                "Tick interval {}us is too slow for a {}us step interval",
                tick_interval_us, step_interval_us
            ),
            ConfigError::InvalidTiming { tick_interval_us, max_jitter_us } => write!(
                f,
                "Invalid timing: jitter {}us must be below a non-zero tick interval ({}us)",
                max_jitter_us, tick_interval_us
            ),
            ConfigError::InvalidGearRatio(v) => write!(f, "Invalid gear ratio: {}. Must be > 0", v),
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::PivotOutOfRange { phase, steps, limit } => write!(
                f,
                "Phase {} maps to pivot position {} outside +/-{}",
                phase, steps, limit
            ),
            ConfigError::InvalidCoefficient(name) => write!(f, "Coefficient '{}' is not finite", name),
            ConfigError::InvalidBrightness(v) => write!(f, "Invalid brightness: {}. Must be 0-100", v),
            ConfigError::InvalidAmbientLimits { lower, upper } => write!(
                f,
                "Invalid ambient limits: lower ({}) must be < upper ({}) <= 100",
                lower, upper
            ),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::LampError => write!(f, "Lamp PWM operation failed"),
            MotorError::UnknownChannel(ix) => write!(f, "Channel {} is not allocated", ix),
        }
    }
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::PhaseOutOfRange(p) => write!(f, "Phase {} out of range 0 .. 59", p),
            DisplayError::Busy => write!(f, "Display is moving"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Error::Display(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for DisplayError {}
