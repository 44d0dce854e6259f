//! Error types for relay and mixer access

use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

/// Errors constructing protocol values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Attenuation code does not fit in six bits
    #[error("invalid attenuation code: 0x{0:02X}")]
    InvalidCode(u8),

    /// Volume percentage outside 0..=100
    #[error("invalid volume percentage: {0}")]
    InvalidPercent(i64),
}

/// Errors driving the relay bank
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// A byte could not be written to the bus
    #[error("bus write of 0x{byte:02X} failed: {kind:?}")]
    Bus { byte: u8, kind: ErrorKind },
}

/// Errors reported by a mixer control
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MixerError {
    /// The control does not offer this feature (e.g. no mute switch)
    #[error("{control}: {feature} not supported")]
    Unsupported { control: String, feature: String },

    /// Reading a value failed
    #[error("{control}: read failed: {reason}")]
    Read { control: String, reason: String },

    /// Writing a value failed
    #[error("{control}: write failed: {reason}")]
    Write { control: String, reason: String },

    /// Refreshing pending driver events failed
    #[error("{control}: event handling failed: {reason}")]
    Events { control: String, reason: String },
}

impl MixerError {
    /// Whether this error only signals a missing feature
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}
