//! Illumination of the moon picture.
//!
//! The display lights the picture from one of two lamps: one for the waxing
//! half of the lunation and one for the waning half. The controller reports
//! every transition and arrival; what to light is up to the implementation.

use embedded_hal::pwm::SetDutyCycle;

use crate::config::{AmbientLimits, IlluminationConfig};
use crate::display::Phase;
use crate::error::{ConfigError, MotorError};

/// Receives phase events from the display controller.
pub trait Illumination {
    /// Called at the start of every `run`.
    fn tick(&mut self) {}

    /// The display is about to step toward `target`.
    fn on_transition_to(&mut self, target: Phase);

    /// The display has come to rest at `phase`.
    fn on_arrived_at(&mut self, phase: Phase);
}

/// No illumination.
impl Illumination for () {
    fn on_transition_to(&mut self, _target: Phase) {}

    fn on_arrived_at(&mut self, _phase: Phase) {}
}

/// Which lamps are lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lamps {
    /// Waxing lamp.
    pub waxing: bool,
    /// Waning lamp.
    pub waning: bool,
}

impl Lamps {
    /// Lamps while moving toward `target`.
    ///
    /// Both are lit on the way to full moon and neither on the way to new moon.
    pub fn moving_to(target: Phase) -> Self {
        let p = target.value();
        Self {
            waxing: (1..=30).contains(&p),
            waning: (30..=58).contains(&p),
        }
    }

    /// Lamps while resting at `phase`.
    pub fn at(phase: Phase) -> Self {
        let p = phase.value();
        Self {
            waxing: (1..=29).contains(&p),
            waning: (30..=58).contains(&p),
        }
    }
}

/// Two PWM lamps dimmed by a brightness setting and the ambient light level.
pub struct Illuminator<WX, WN> {
    waxing: WX,
    waning: WN,
    waxing_max_duty: u16,
    waning_max_duty: u16,
    /// Percent of max duty.
    brightness: u8,
    ambient_limits: AmbientLimits,
    /// Latest ambient reading (0..=100); `None` until one is supplied.
    ambient: Option<u8>,
    lamps: Lamps,
    /// Outputs need rewriting at the next tick.
    stale: bool,
}

impl<WX: SetDutyCycle, WN: SetDutyCycle> Illuminator<WX, WN> {
    /// Create an illuminator with both lamps off, full brightness and a
    /// maximum duty of 255.
    pub fn new(waxing: WX, waning: WN) -> Self {
        Self::from_config(waxing, waning, &IlluminationConfig::default())
    }

    /// Create an illuminator from configuration.
    pub fn from_config(waxing: WX, waning: WN, config: &IlluminationConfig) -> Self {
        Self {
            waxing,
            waning,
            waxing_max_duty: config.waxing_max_duty,
            waning_max_duty: config.waning_max_duty,
            brightness: config.brightness.min(100),
            ambient_limits: config.ambient,
            ambient: None,
            lamps: Lamps::default(),
            stale: true,
        }
    }

    /// Lamps currently selected.
    #[inline]
    pub fn lamps(&self) -> Lamps {
        self.lamps
    }

    /// Brightness setting in percent.
    #[inline]
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Set the brightness in percent, clamped to 100.
    pub fn set_brightness(&mut self, percent: u8) {
        self.brightness = percent.min(100);
        self.stale = true;
    }

    /// Duty cycles at 100% brightness, `(waxing, waning)`.
    #[inline]
    pub fn max_duty(&self) -> (u16, u16) {
        (self.waxing_max_duty, self.waning_max_duty)
    }

    /// Set the duty cycles used at 100% brightness.
    pub fn set_max_duty(&mut self, waxing: u16, waning: u16) {
        self.waxing_max_duty = waxing;
        self.waning_max_duty = waning;
        self.stale = true;
    }

    /// Latest ambient light reading.
    #[inline]
    pub fn ambient(&self) -> Option<u8> {
        self.ambient
    }

    /// Supply an ambient light reading, 0 (dark) to 100 (bright).
    pub fn set_ambient(&mut self, level: u8) {
        self.ambient = Some(level.min(100));
        self.stale = true;
    }

    /// Set the ambient range over which the lamps ramp from off to full.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidAmbientLimits` unless `lower < upper <= 100`;
    /// the previous limits are kept.
    pub fn set_ambient_limits(&mut self, limits: AmbientLimits) -> Result<(), ConfigError> {
        if !limits.is_valid() {
            return Err(ConfigError::InvalidAmbientLimits {
                lower: limits.lower,
                upper: limits.upper,
            });
        }
        self.ambient_limits = limits;
        self.stale = true;
        Ok(())
    }

    /// Brightness after ambient dimming, in percent.
    pub fn effective_brightness(&self) -> u8 {
        let ambient = self
            .ambient
            .map_or(100, |level| self.ambient_limits.brightness_for(level));
        (u16::from(self.brightness) * u16::from(ambient) / 100) as u8
    }

    /// Write both lamp outputs.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::LampError` if either PWM rejects its duty cycle.
    pub fn apply(&mut self) -> Result<(), MotorError> {
        let brightness = self.effective_brightness();

        let duty = scaled_duty(self.lamps.waxing, self.waxing_max_duty, brightness, &self.waxing);
        self.waxing
            .set_duty_cycle(duty)
            .map_err(|_| MotorError::LampError)?;

        let duty = scaled_duty(self.lamps.waning, self.waning_max_duty, brightness, &self.waning);
        self.waning
            .set_duty_cycle(duty)
            .map_err(|_| MotorError::LampError)?;

        self.stale = false;
        Ok(())
    }

    /// Release the PWM outputs.
    pub fn into_inner(self) -> (WX, WN) {
        (self.waxing, self.waning)
    }

    fn select(&mut self, lamps: Lamps) {
        self.lamps = lamps;
        self.stale = true;
        // A failed write stays stale and is retried on the next tick
        let _ = self.apply();
    }
}

fn scaled_duty<P: SetDutyCycle>(lit: bool, max_duty: u16, brightness: u8, pwm: &P) -> u16 {
    if !lit {
        return 0;
    }
    let duty = u32::from(max_duty) * u32::from(brightness) / 100;
    duty.min(u32::from(pwm.max_duty_cycle())) as u16
}

impl<WX: SetDutyCycle, WN: SetDutyCycle> Illumination for Illuminator<WX, WN> {
    fn tick(&mut self) {
        if self.stale {
            let _ = self.apply();
        }
    }

    fn on_transition_to(&mut self, target: Phase) {
        self.select(Lamps::moving_to(target));
    }

    fn on_arrived_at(&mut self, phase: Phase) {
        self.select(Lamps::at(phase));
    }
}
