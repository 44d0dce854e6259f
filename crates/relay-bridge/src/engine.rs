//! Volume bridge engine
//!
//! The core logic that watches the input mixer control, decides when the
//! relay bank needs a new step, and keeps the output control pinned at its
//! fixed gain.

use std::mem;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use relay_protocol::{AttenuationCode, Mixer, RelayController, VolumePercent};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::BridgeError;
use crate::events::{BridgeEvent, PollOutcome};
use crate::state::BridgeState;
use crate::translation::{translate, MUTE_CODE};

/// Bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Delay between poll cycles (ms)
    pub poll_interval_ms: u64,
    /// Delay after a failed poll cycle (ms)
    pub error_backoff_ms: u64,
    /// Volume the output control is held at
    pub fixed_gain_percent: u8,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            error_backoff_ms: 1000,
            fixed_gain_percent: 100,
        }
    }
}

impl BridgeConfig {
    /// Poll interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Error backoff as a duration
    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }

    /// Fixed output gain, clamped to a valid percentage
    pub fn fixed_gain(&self) -> VolumePercent {
        VolumePercent::clamped(self.fixed_gain_percent as i64)
    }
}

/// Mirrors one mixer control onto the relay attenuator
pub struct VolumeBridge<M, I2C, D> {
    config: BridgeConfig,
    input: M,
    output: Option<M>,
    relay: RelayController<I2C, D>,
    state: BridgeState,
    event_buffer: Vec<BridgeEvent>,
}

impl<M, I2C, D> VolumeBridge<M, I2C, D>
where
    M: Mixer,
    I2C: I2c,
    D: DelayNs,
{
    /// Create a bridge with default configuration
    pub fn new(input: M, relay: RelayController<I2C, D>) -> Self {
        Self::with_config(BridgeConfig::default(), input, relay)
    }

    /// Create with custom configuration
    pub fn with_config(config: BridgeConfig, input: M, relay: RelayController<I2C, D>) -> Self {
        Self {
            config,
            input,
            output: None,
            relay,
            state: BridgeState::default(),
            event_buffer: Vec::new(),
        }
    }

    /// Also hold `output` at the fixed gain on every cycle
    pub fn with_output(mut self, output: M) -> Self {
        self.output = Some(output);
        self
    }

    /// Get the current configuration
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Get the tracked state
    pub fn state(&self) -> &BridgeState {
        &self.state
    }

    /// Name of the input control
    pub fn input_name(&self) -> &str {
        self.input.name()
    }

    /// Name of the output control, if one is enforced
    pub fn output_name(&self) -> Option<&str> {
        self.output.as_ref().map(|m| m.name())
    }

    /// Run one poll cycle
    ///
    /// Refreshes and reads the input control, applies a mute transition
    /// followed by a volume transition, then enforces the output gain.
    /// Volume changes are ignored while the mixer is muted. The output
    /// check runs even when a relay write failed, and a failing output
    /// control never holds back the relay. Returns the events of this
    /// cycle, or the first error encountered.
    pub fn poll(&mut self) -> Result<PollOutcome, BridgeError> {
        self.event_buffer.clear();

        self.input.handle_events()?;
        let volume = VolumePercent::clamped(self.input.volume()?);
        let muted = match self.input.mute() {
            Ok(muted) => muted,
            Err(e) if e.is_unsupported() => false,
            Err(e) => return Err(e.into()),
        };

        let relayed = self.apply_transitions(volume, muted);
        let gain = self.enforce_fixed_gain();
        relayed?;
        gain?;

        Ok(PollOutcome {
            events: self.drain_events(),
        })
    }

    /// Apply a volume to the relay bank
    ///
    /// Writes only when the translated code differs from the last code
    /// written. Always records `volume` as the restore point and clears the
    /// bridge's mute.
    pub fn apply_volume(&mut self, volume: VolumePercent) -> Result<(), BridgeError> {
        let code = translate(volume, false);
        info!(
            "Volume change: {} -> {} (was: {})",
            volume,
            code,
            self.state.written_display()
        );

        if self.state.written != Some(code) {
            self.write_relay(code)?;
        } else {
            debug!("Relay already at {}, skipping write", code);
        }

        self.state.volume = Some(volume);
        self.state.muted = false;
        Ok(())
    }

    /// Apply a mute transition to the relay bank
    ///
    /// Muting writes [`MUTE_CODE`] and keeps the last volume; unmuting
    /// restores that volume's code. Before any volume has been seen there is
    /// nothing to restore. The bridge's mute only changes once the relay
    /// accepted the write.
    pub fn apply_mute(&mut self, muted: bool) -> Result<(), BridgeError> {
        if muted {
            self.write_relay(MUTE_CODE)?;
        } else if let Some(volume) = self.state.volume {
            self.write_relay(translate(volume, false))?;
        } else {
            debug!("No volume seen yet, nothing to restore");
        }

        self.state.muted = muted;
        Ok(())
    }

    /// Drain pending events
    pub fn drain_events(&mut self) -> Vec<BridgeEvent> {
        mem::take(&mut self.event_buffer)
    }

    /// Reset the output control if it drifted from the fixed gain
    fn enforce_fixed_gain(&mut self) -> Result<(), BridgeError> {
        let Some(output) = self.output.as_mut() else {
            return Ok(());
        };
        let target = self.config.fixed_gain();

        output.handle_events()?;
        let current = output.volume()?;
        if current == target.as_u8() as i64 {
            return Ok(());
        }

        warn!(
            "{} volume at {}%, resetting to {}",
            output.name(),
            current,
            target
        );
        output.set_volume(target)?;
        self.event_buffer.push(BridgeEvent::OutputGainCorrected {
            control: output.name().to_string(),
            from: current,
            to: target,
        });
        Ok(())
    }

    /// Mute then volume transitions for one cycle
    ///
    /// A failed apply forgets the matching observation so the next cycle
    /// sees a change and writes again, even if the mixer went back to its
    /// old value in between.
    fn apply_transitions(
        &mut self,
        volume: VolumePercent,
        muted: bool,
    ) -> Result<(), BridgeError> {
        if self.state.mute_changed(muted) {
            info!(
                "{} mute {} (was {:?})",
                self.input.name(),
                if muted { "on" } else { "off" },
                self.state.observed_mute
            );
            self.event_buffer.push(BridgeEvent::MuteChanged { muted });
            if let Err(e) = self.apply_mute(muted) {
                self.state.observed_mute = None;
                return Err(e);
            }
            self.state.observed_mute = Some(muted);
        }

        if !muted && self.state.volume_changed(volume) {
            self.event_buffer.push(BridgeEvent::VolumeChanged { volume });
            if let Err(e) = self.apply_volume(volume) {
                self.state.observed_volume = None;
                return Err(e);
            }
            self.state.observed_volume = Some(volume);
        }

        Ok(())
    }

    /// Write a code, forgetting the last written code if the write failed
    ///
    /// A failed pair can leave the bank at the guard byte, so nothing is
    /// known about the relay until the next successful write.
    fn write_relay(&mut self, code: AttenuationCode) -> Result<(), BridgeError> {
        if let Err(e) = self.relay.apply(code) {
            self.state.written = None;
            return Err(e.into());
        }
        self.state.written = Some(code);
        self.event_buffer.push(BridgeEvent::RelayWritten { code });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_sim::{
        VirtualBus, VirtualBusHandle, VirtualDelay, VirtualMixer, VirtualMixerHandle,
    };

    type TestBridge = VolumeBridge<VirtualMixer, VirtualBus, VirtualDelay>;

    fn make_bridge(volume: i64) -> (TestBridge, VirtualMixerHandle, VirtualBusHandle) {
        let mixer = VirtualMixer::new("Master", volume);
        let knob = mixer.handle();
        let bus = VirtualBus::new();
        let log = bus.handle();
        let bridge = VolumeBridge::new(mixer, RelayController::new(bus, VirtualDelay::new()));
        (bridge, knob, log)
    }

    fn pct(v: u8) -> VolumePercent {
        VolumePercent::new(v).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.error_backoff(), Duration::from_millis(1000));
        assert_eq!(config.fixed_gain(), VolumePercent::MAX);
    }

    #[test]
    fn test_first_poll_establishes_baseline() {
        let (mut bridge, _knob, log) = make_bridge(50);

        let outcome = bridge.poll().unwrap();

        assert_eq!(outcome.relay_writes(), vec![translate(pct(50), false)]);
        assert_eq!(log.bytes(), vec![0x3F, 0x60]);
        assert_eq!(bridge.state().observed_mute, Some(false));
        assert_eq!(bridge.state().observed_volume, Some(pct(50)));
    }

    #[test]
    fn test_steady_state_is_idle() {
        let (mut bridge, _knob, log) = make_bridge(50);
        bridge.poll().unwrap();
        log.clear();

        let outcome = bridge.poll().unwrap();

        assert!(outcome.is_idle());
        assert_eq!(log.write_count(), 0);
    }

    #[test]
    fn test_apply_volume_twice_writes_once() {
        let (mut bridge, _knob, log) = make_bridge(0);

        bridge.apply_volume(pct(70)).unwrap();
        bridge.apply_volume(pct(70)).unwrap();

        assert_eq!(log.write_count(), 2);
        assert_eq!(bridge.state().written.map(|c| c.as_u8()), Some(44));
    }

    #[test]
    fn test_apply_volume_clears_mute() {
        let (mut bridge, _knob, _log) = make_bridge(0);

        bridge.apply_mute(true).unwrap();
        assert!(bridge.state().muted);

        bridge.apply_volume(pct(10)).unwrap();
        assert!(!bridge.state().muted);
    }

    #[test]
    fn test_apply_mute_keeps_volume() {
        let (mut bridge, _knob, log) = make_bridge(0);
        bridge.apply_volume(pct(100)).unwrap();
        log.clear();

        bridge.apply_mute(true).unwrap();
        assert_eq!(log.bytes(), vec![0x3F, 0x7F]);
        assert_eq!(bridge.state().volume, Some(pct(100)));

        log.clear();
        bridge.apply_mute(false).unwrap();
        assert_eq!(log.bytes(), vec![0x3F, 0x40]);
    }

    #[test]
    fn test_unmute_without_volume_writes_nothing() {
        let (mut bridge, _knob, log) = make_bridge(0);

        bridge.apply_mute(false).unwrap();

        assert_eq!(log.write_count(), 0);
    }

    #[test]
    fn test_failed_mute_write_keeps_bridge_unmuted() {
        let (mut bridge, _knob, log) = make_bridge(0);
        bridge.apply_volume(pct(100)).unwrap();
        log.fail_writes_after(1, 1);

        assert!(bridge.apply_mute(true).is_err());

        assert!(!bridge.state().muted);
        assert_eq!(bridge.state().written, None);
        assert_eq!(bridge.state().volume, Some(pct(100)));
    }

    #[test]
    fn test_config_partial_deserialize() {
        let config: BridgeConfig =
            serde_json::from_str(r#"{"poll_interval_ms": 50, "error_backoff_ms": 2000}"#)
                .unwrap();

        assert_eq!(config.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.error_backoff(), Duration::from_millis(2000));
        assert_eq!(config.fixed_gain_percent, 100);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = BridgeConfig {
            fixed_gain_percent: 90,
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: BridgeConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
        assert_eq!(parsed.fixed_gain().as_u8(), 90);
    }

    #[test]
    fn test_unsupported_mute_reads_as_unmuted() {
        let (mut bridge, knob, _log) = make_bridge(30);
        knob.set_mute_supported(false);

        bridge.poll().unwrap();

        assert_eq!(bridge.state().observed_mute, Some(false));
        assert_eq!(bridge.state().observed_volume, Some(pct(30)));
    }
}
