//! Mixer control capability
//!
//! A [`Mixer`] is one named volume control on a sound card. The bridge only
//! needs a handful of operations from it, so ALSA controls and simulated
//! controls can be swapped freely.

use crate::code::VolumePercent;
use crate::error::MixerError;

/// A single mixer control
pub trait Mixer {
    /// Control name, used in log messages
    fn name(&self) -> &str;

    /// Process pending driver events so the next reads are fresh
    fn handle_events(&mut self) -> Result<(), MixerError>;

    /// Current volume in percent
    ///
    /// The raw value is returned as reported; callers clamp it.
    fn volume(&self) -> Result<i64, MixerError>;

    /// Set the volume
    fn set_volume(&mut self, volume: VolumePercent) -> Result<(), MixerError>;

    /// Current mute state
    ///
    /// Controls without a mute switch return [`MixerError::Unsupported`].
    fn mute(&self) -> Result<bool, MixerError>;
}
