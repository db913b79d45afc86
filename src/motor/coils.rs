//! ULN2003 coil driver.
//!
//! A 28BYJ-48 is driven through eight half-step states. Walking the table in
//! ascending order turns the shaft counterclockwise, descending clockwise.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::MotorError;
use crate::motion::Direction;

/// Coil energization pattern per winding phase; bit `j` drives input `IN(j+1)`.
pub const HALF_STEP_SEQUENCE: [u8; 8] = [
    0b0001, 0b1001, 0b1000, 0b1100, 0b0100, 0b0110, 0b0010, 0b0011,
];

/// The four coil outputs of one motor and where it is in the half-step cycle.
pub struct Coils<P> {
    /// IN1..IN4.
    pins: [P; 4],

    /// Index into [`HALF_STEP_SEQUENCE`].
    winding: u8,

    /// Whether any coil may currently be on.
    energized: bool,
}

impl<P: OutputPin> Coils<P> {
    /// Take ownership of the coil outputs. They are not written until the
    /// first [`Coils::release`] or [`Coils::energize`].
    pub fn new(pins: [P; 4]) -> Self {
        Self {
            pins,
            winding: 0,
            energized: false,
        }
    }

    /// Current winding phase (0..8).
    #[inline]
    pub fn winding(&self) -> u8 {
        self.winding
    }

    /// Whether the coils are (or may be) powered.
    #[inline]
    pub fn is_energized(&self) -> bool {
        self.energized
    }

    /// Move the winding phase one half step in `direction` without writing the outputs.
    #[inline]
    pub fn advance(&mut self, direction: Direction) {
        let delta = match direction {
            Direction::Clockwise => 7,
            Direction::CounterClockwise => 1,
        };
        self.winding = (self.winding + delta) & 0x7;
    }

    /// Apply the pattern for the current winding phase.
    pub fn energize(&mut self) -> Result<(), MotorError> {
        self.energized = true;
        self.write(HALF_STEP_SEQUENCE[self.winding as usize])
    }

    /// Turn all four coils off. The motor holds by its gearing alone.
    pub fn release(&mut self) -> Result<(), MotorError> {
        self.write(0)?;
        self.energized = false;
        Ok(())
    }

    fn write(&mut self, pattern: u8) -> Result<(), MotorError> {
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            let state = PinState::from((pattern >> bit) & 1 == 1);
            pin.set_state(state).map_err(|_| MotorError::PinError)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    fn expect(states: &[State]) -> PinMock {
        let transactions: Vec<Transaction> = states.iter().map(|s| Transaction::set(*s)).collect();
        PinMock::new(&transactions)
    }

    #[test]
    fn test_winding_wraps_both_ways() {
        let pins = [expect(&[]), expect(&[]), expect(&[]), expect(&[])];
        let mut checks = pins.clone();
        let mut coils = Coils::new(pins);

        coils.advance(Direction::Clockwise);
        assert_eq!(coils.winding(), 7);
        coils.advance(Direction::CounterClockwise);
        coils.advance(Direction::CounterClockwise);
        assert_eq!(coils.winding(), 1);

        for pin in checks.iter_mut() {
            pin.done();
        }
    }

    #[test]
    fn test_clockwise_step_then_release() {
        use State::{High, Low};

        // Winding 7 = 0b0011 (IN1 + IN2), then all off
        let pins = [
            expect(&[High, Low]),
            expect(&[High, Low]),
            expect(&[Low, Low]),
            expect(&[Low, Low]),
        ];
        let mut checks = pins.clone();
        let mut coils = Coils::new(pins);

        coils.advance(Direction::Clockwise);
        coils.energize().unwrap();
        assert!(coils.is_energized());

        coils.release().unwrap();
        assert!(!coils.is_energized());

        for pin in checks.iter_mut() {
            pin.done();
        }
    }

    #[test]
    fn test_sequence_is_half_stepping() {
        // Adjacent patterns differ by exactly one coil
        for i in 0..8 {
            let a = HALF_STEP_SEQUENCE[i];
            let b = HALF_STEP_SEQUENCE[(i + 1) % 8];
            assert_eq!((a ^ b).count_ones(), 1);
        }
    }
}
