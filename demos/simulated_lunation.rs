//! Example: A simulated lunation.
//!
//! This example demonstrates how to:
//! - Build the scheduler and both display channels from a TOML configuration
//! - Drive the phase controller from the lunation clock
//! - Drive the two lamps and persist the displayed phase
//!
//! Timer ticks are simulated in the main loop, so this runs on the host.
//!
//! Run with: `cargo run --example simulated_lunation --features std`

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};
use moon_display::{
    lunation, parse_config, AxisId, DisplayRecord, Illuminator, MoonDisplay, PhaseMap, Result,
    Scheduler,
};

/// Coil output that goes nowhere.
struct SimPin;

impl PinErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// Lamp that accepts any duty cycle.
struct SimLamp;

impl PwmErrorType for SimLamp {
    type Error = Infallible;
}

impl SetDutyCycle for SimLamp {
    fn max_duty_cycle(&self) -> u16 {
        1000
    }

    fn set_duty_cycle(&mut self, _duty: u16) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

const CONFIG: &str = r#"
[scheduler]
tick_interval_us = 400

[pivot]
name = "pivot"
speed = 2000

[leadscrew]
name = "leadscrew"
speed = 2000

[illumination]
brightness = 60
"#;

const DAY_SECS: i64 = 86_400;

fn main() -> Result<()> {
    println!("=== Simulated Lunation ===\n");

    let config = parse_config(CONFIG)?;
    let scheduler: Scheduler<NoopRawMutex, SimPin> = Scheduler::from_config(&config.scheduler);
    let tick_us = scheduler.tick_interval_us();

    let pivot = scheduler
        .builder()
        .coils([SimPin, SimPin, SimPin, SimPin])
        .from_axis_config(&config.pivot)
        .build()?;
    let leadscrew = scheduler
        .builder()
        .coils([SimPin, SimPin, SimPin, SimPin])
        .from_axis_config(&config.leadscrew)
        .build()?;

    let lamps = Illuminator::from_config(SimLamp, SimLamp, &config.illumination);

    let mut record = DisplayRecord::default();
    let mut display = MoonDisplay::new(
        pivot,
        leadscrew,
        lamps,
        PhaseMap::from_config(&config.mapping),
        record.phase,
    );

    let mut now_us: u32 = 0;
    let start = lunation::REFERENCE_NEW_MOON + 3 * DAY_SECS;

    // Follow the moon for a little over one lunation, a day at a time
    for day in 0..31 {
        let unix_secs = start + day * DAY_SECS;
        let wanted = lunation::phase_at(unix_secs);

        if wanted != display.phase() {
            display.show_phase(wanted.value().into())?;
        }

        let mut ticks: u64 = 0;
        loop {
            now_us = now_us.wrapping_add(tick_us);
            scheduler.tick(now_us)?;
            ticks += 1;

            if let Some(phase) = display.run() {
                if record.update_phase(phase) {
                    println!("  arrived at phase {:2}", phase.value());
                }
            }
            if !display.is_moving() && !display.is_resetting() && display.target() == display.phase() {
                break;
            }
        }

        let lamps = display.illumination().lamps();
        println!(
            "Day {:2}: phase {:2} (pivot {:5}, leadscrew {:6}), waxing lamp {}, waning lamp {}, {:.1}s of stepping, next phase in {} min",
            day,
            display.phase().value(),
            display.axis_position(AxisId::Pivot),
            display.axis_position(AxisId::Leadscrew),
            if lamps.waxing { "on " } else { "off" },
            if lamps.waning { "on " } else { "off" },
            ticks as f64 * f64::from(tick_us) / 1e6,
            lunation::millis_until_next_phase(unix_secs) / 60_000,
        );
    }

    println!("\nSaved record:\n{}", record.to_toml()?);

    Ok(())
}
