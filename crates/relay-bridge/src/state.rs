//! Bridge state tracking

use relay_protocol::{AttenuationCode, VolumePercent};

/// What the bridge has observed and written so far
///
/// Every field starts unknown so the first poll cycle always applies the
/// current mixer state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeState {
    /// Mixer volume as of the last applied volume change
    pub observed_volume: Option<VolumePercent>,
    /// Mixer mute as of the last applied mute change
    pub observed_mute: Option<bool>,
    /// Last volume handed to the relay (restored on unmute)
    pub volume: Option<VolumePercent>,
    /// Whether the bridge currently holds the relay at the mute code
    pub muted: bool,
    /// Last code successfully written to the relay
    pub written: Option<AttenuationCode>,
}

impl BridgeState {
    /// Whether the mute observation differs from `mute`
    pub fn mute_changed(&self, mute: bool) -> bool {
        self.observed_mute != Some(mute)
    }

    /// Whether the volume observation differs from `volume`
    pub fn volume_changed(&self, volume: VolumePercent) -> bool {
        self.observed_volume != Some(volume)
    }

    /// Format the last written code for display
    pub fn written_display(&self) -> String {
        match self.written {
            Some(code) => code.to_string(),
            None => "---".to_string(),
        }
    }
}
