//! Events produced by a poll cycle

use relay_protocol::{AttenuationCode, VolumePercent};

/// Something the bridge did during a poll cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// The mixer mute switch changed (or was read for the first time)
    MuteChanged { muted: bool },
    /// The mixer volume changed while unmuted (or was read for the first time)
    VolumeChanged { volume: VolumePercent },
    /// A code was written to the relay bank
    RelayWritten { code: AttenuationCode },
    /// The output control drifted from its fixed gain and was reset
    OutputGainCorrected {
        control: String,
        from: i64,
        to: VolumePercent,
    },
}

/// Result of a successful poll cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// Events in the order they happened
    pub events: Vec<BridgeEvent>,
}

impl PollOutcome {
    /// Whether nothing happened this cycle
    pub fn is_idle(&self) -> bool {
        self.events.is_empty()
    }

    /// Codes written to the relay this cycle
    pub fn relay_writes(&self) -> Vec<AttenuationCode> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BridgeEvent::RelayWritten { code } => Some(*code),
                _ => None,
            })
            .collect()
    }

    /// Whether the output gain was corrected this cycle
    pub fn corrected_output(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, BridgeEvent::OutputGainCorrected { .. }))
    }
}
