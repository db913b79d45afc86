//! Configuration validation.

use crate::display::{Phase, PhaseMap};
use crate::error::{ConfigError, Error, Result};

use super::{AxisConfig, DisplayConfig, IlluminationConfig, MappingConfig, SchedulerConfig};

/// Validate a display configuration.
///
/// Checks:
/// - Tick interval is non-zero and the jitter tolerance is below it
/// - Both axes step no faster than the tick interval can service
/// - Mapping constants are positive and finite
/// - Every phase maps inside the leadscrew fit's pivot range
/// - Brightness and ambient limits are in range
pub fn validate_config(config: &DisplayConfig) -> Result<()> {
    validate_scheduler(&config.scheduler)?;

    for axis in config.axes() {
        validate_axis(axis, &config.scheduler)?;
    }

    validate_mapping(&config.mapping)?;
    validate_illumination(&config.illumination)?;

    Ok(())
}

fn validate_scheduler(config: &SchedulerConfig) -> Result<()> {
    if config.tick_interval_us == 0 || config.max_jitter_us >= config.tick_interval_us {
        return Err(Error::Config(ConfigError::InvalidTiming {
            tick_interval_us: config.tick_interval_us,
            max_jitter_us: config.max_jitter_us,
        }));
    }

    Ok(())
}

fn validate_axis(axis: &AxisConfig, scheduler: &SchedulerConfig) -> Result<()> {
    // The tick must be strictly shorter than the step interval
    let step_interval_us = axis.speed.interval_us();
    if step_interval_us <= scheduler.tick_interval_us {
        return Err(Error::Config(ConfigError::TickTooSlow {
            tick_interval_us: scheduler.tick_interval_us,
            step_interval_us,
        }));
    }

    Ok(())
}

fn validate_mapping(config: &MappingConfig) -> Result<()> {
    if config.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(
            config.steps_per_revolution,
        )));
    }

    if config.gear_ratio.is_nan() || config.gear_ratio <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidGearRatio(config.gear_ratio)));
    }

    let coefficients = [
        ("leadscrew_base", config.leadscrew_base),
        ("leadscrew_linear", config.leadscrew_linear),
        ("leadscrew_quadratic", config.leadscrew_quadratic),
    ];
    for (name, value) in coefficients {
        if !value.is_finite() {
            return Err(Error::Config(ConfigError::InvalidCoefficient(name)));
        }
    }

    let map = PhaseMap::from_config(config);
    for phase in Phase::all() {
        let steps = map.pivot_steps_for_phase(phase);
        if config.pivot_limit <= 0 || steps.unsigned_abs() > config.pivot_limit.unsigned_abs() {
            return Err(Error::Config(ConfigError::PivotOutOfRange {
                phase: phase.value(),
                steps,
                limit: config.pivot_limit,
            }));
        }
    }

    Ok(())
}

fn validate_illumination(config: &IlluminationConfig) -> Result<()> {
    if config.brightness > 100 {
        return Err(Error::Config(ConfigError::InvalidBrightness(config.brightness)));
    }

    if !config.ambient.is_valid() {
        return Err(Error::Config(ConfigError::InvalidAmbientLimits {
            lower: config.ambient.lower,
            upper: config.ambient.upper,
        }));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::StepsPerSec;
    use crate::config::AmbientLimits;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&DisplayConfig::default()).is_ok());
    }

    #[test]
    fn test_speed_too_fast_for_tick() {
        let mut config = DisplayConfig::default();
        config.leadscrew.speed = StepsPerSec::or_default(2500);

        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::TickTooSlow { step_interval_us: 400, .. }))
        ));
    }

    #[test]
    fn test_speed_at_tick_rate_rejected() {
        // 1953 steps/s is a 512 us interval, equal to the default tick
        let mut config = DisplayConfig::default();
        config.pivot.speed = StepsPerSec::or_default(1953);
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::TickTooSlow { step_interval_us: 512, .. }))
        ));

        config.pivot.speed = StepsPerSec::or_default(1949);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_jitter_not_below_tick() {
        let mut config = DisplayConfig::default();
        config.scheduler.max_jitter_us = 512;

        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidTiming { .. }))
        ));
    }

    #[test]
    fn test_invalid_gear_ratio() {
        let mut config = DisplayConfig::default();
        config.mapping.gear_ratio = -1.0;

        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidGearRatio(_)))
        ));
    }

    #[test]
    fn test_pivot_outside_fit() {
        // 78 degrees at 21.5 steps/degree is 1677 steps, past the 1600 limit
        let mut config = DisplayConfig::default();
        config.mapping.gear_ratio = 1.89;

        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::PivotOutOfRange { phase: 0, .. }))
        ));
    }

    #[test]
    fn test_non_finite_coefficient() {
        let mut config = DisplayConfig::default();
        config.mapping.leadscrew_linear = f64::NAN;

        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidCoefficient("leadscrew_linear")))
        ));
    }

    #[test]
    fn test_invalid_illumination() {
        let mut config = DisplayConfig::default();
        config.illumination.brightness = 101;
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidBrightness(101)))
        ));

        let mut config = DisplayConfig::default();
        config.illumination.ambient = AmbientLimits::new(80, 20);
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidAmbientLimits { lower: 80, upper: 20 }))
        ));
    }
}
