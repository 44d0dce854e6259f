//! Relay attenuator driver.
//!
//! Switching relays directly from one attenuation step to another produces an
//! audible click, because intermediate relay states briefly pass the signal at
//! the wrong level. The driver therefore always writes the guard byte first,
//! waits for the relays to settle, and only then writes the target step.
//!
//! The driver is generic over any [`embedded_hal::i2c::I2c`] and
//! [`embedded_hal::delay::DelayNs`] implementation.
//!
//! # Example
//!
//! ```ignore
//! let mut relay = RelayController::new(i2c, delay);
//! relay.apply(AttenuationCode::new(0x1F)?)?;
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};
use tracing::{debug, trace};

use crate::code::{relay_byte, AttenuationCode};
use crate::error::RelayError;
use crate::RELAY_ADDR;

/// Byte written before every step change
pub const GUARD_BYTE: u8 = 0x3F;

/// Control bit that must be set in every step byte
pub const CONTROL_BIT: u8 = 0x40;

/// Minimum relay settle time between the guard write and the step write.
///
/// `DelayNs` implementations may overshoot this but never return early.
pub const SETTLE_TIME_US: u32 = 600;

/// Relay attenuator driver.
///
/// Holds no volume semantics; it only knows raw attenuation codes.
pub struct RelayController<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C, D> RelayController<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver for the board at the default address (0x21)
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::new_with_address(i2c, delay, RELAY_ADDR)
    }

    /// Create a driver for a board at a specific address
    pub fn new_with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Bus address of the board
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Switch the relay bank to `code`.
    ///
    /// Always performs two writes: [`GUARD_BYTE`], a [`SETTLE_TIME_US`] wait,
    /// then the step byte. Repeated codes are written again; suppressing
    /// redundant calls is up to the caller. If the guard write fails the step
    /// byte is not sent.
    pub fn apply(&mut self, code: AttenuationCode) -> Result<(), RelayError> {
        let byte = relay_byte(code);
        debug!(
            "Writing relay step {} ({}) -> 0x{:02X}",
            code,
            code.as_u8(),
            byte
        );

        self.write_byte(GUARD_BYTE)?;
        self.delay.delay_us(SETTLE_TIME_US);
        self.write_byte(byte)
    }

    /// Release the bus and delay provider
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), RelayError> {
        trace!("i2c write 0x{:02X} -> 0x{:02X}", self.address, byte);
        self.i2c
            .write(self.address, &[byte])
            .map_err(|e| RelayError::Bus {
                byte,
                kind: e.kind(),
            })
    }
}
