//! Error types for hardware setup

use thiserror::Error;

/// Errors that can occur while opening hardware
///
/// These are startup errors; the daemon exits on any of them.
#[derive(Debug, Error)]
pub enum HwError {
    /// No sound card with the requested id or name
    #[error("sound card {name} not found (available: {available})")]
    CardNotFound { name: String, available: String },

    /// Mixer control missing on the card
    #[error("mixer control {control} not found on card {card}")]
    ControlNotFound { card: String, control: String },

    /// ALSA library error
    #[error("ALSA error: {0}")]
    Alsa(#[from] alsa::Error),

    /// I2C device could not be opened
    #[error("failed to open I2C bus {path}: {reason}")]
    I2cOpen { path: String, reason: String },
}
