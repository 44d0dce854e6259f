//! Error types for the bridge

use relay_protocol::{MixerError, RelayError};
use thiserror::Error;

/// Errors that can occur during one poll cycle
///
/// All of these are treated as transient by the polling loop.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Mixer read, write or event refresh failed
    #[error("mixer error: {0}")]
    Mixer(#[from] MixerError),

    /// Relay bus write failed
    #[error("relay error: {0}")]
    Relay(#[from] RelayError),
}
