//! Relay Attenuator Protocol Library
//!
//! This crate provides the control-plane vocabulary shared by every part of
//! the relay volume bridge:
//!
//! - **AttenuationCode**: the 6-bit step index understood by the relay bank
//! - **VolumePercent**: a mixer volume clamped to 0..=100
//! - **RelayController**: the two-write guard protocol that switches relays
//!   without audible clicks
//! - **Mixer**: the capability trait implemented by ALSA and simulated mixers
//!
//! # Architecture
//!
//! The relay bank sits behind an I2C port expander at address `0x21`. Each
//! byte written drives the six relay lines (active low) plus a fixed control
//! bit. The bus and the settle delay are taken as
//! [`embedded_hal::i2c::I2c`] and [`embedded_hal::delay::DelayNs`]
//! implementations, so the controller runs unchanged against Linux
//! `/dev/i2c-*` devices or an in-memory mock.
//!
//! # Example
//!
//! ```rust
//! use relay_protocol::{AttenuationCode, relay_byte};
//!
//! let code = AttenuationCode::new(0x00).unwrap();
//! assert_eq!(relay_byte(code), 0x7F);
//! ```

pub mod code;
pub mod error;
pub mod mixer;
pub mod relay;

pub use code::{relay_byte, AttenuationCode, VolumePercent};
pub use error::{MixerError, ProtocolError, RelayError};
pub use mixer::Mixer;
pub use relay::{RelayController, CONTROL_BIT, GUARD_BYTE, SETTLE_TIME_US};

/// Default I2C address of the relay attenuator board
pub const RELAY_ADDR: u8 = 0x21;
