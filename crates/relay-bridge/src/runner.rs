//! Polling loop
//!
//! Drives [`VolumeBridge::poll`] forever. This is the only place transient
//! errors are handled: a failed cycle is logged and retried after the error
//! backoff instead of the poll interval. The loop only ends when the
//! `shutdown` future resolves.

use std::future::Future;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use relay_protocol::Mixer;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::engine::VolumeBridge;

/// Counters collected while the loop ran
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Poll cycles attempted
    pub cycles: u64,
    /// Poll cycles that returned an error
    pub failed_cycles: u64,
    /// Relay codes written
    pub relay_writes: u64,
}

/// Run the bridge until `shutdown` resolves
///
/// Timing comes from the bridge's own [`BridgeConfig`](crate::BridgeConfig).
/// The bridge (and with it the bus and mixer handles) is dropped when the
/// loop returns.
pub async fn run_bridge<M, I2C, D, F>(
    mut bridge: VolumeBridge<M, I2C, D>,
    shutdown: F,
) -> RunSummary
where
    M: Mixer,
    I2C: I2c,
    D: DelayNs,
    F: Future<Output = ()>,
{
    let poll_interval = bridge.config().poll_interval();
    let backoff = bridge.config().error_backoff();
    let mut summary = RunSummary::default();
    tokio::pin!(shutdown);

    info!(
        "Bridging {} to relay (output control: {})",
        bridge.input_name(),
        bridge.output_name().unwrap_or("none")
    );

    loop {
        summary.cycles += 1;

        let delay = match bridge.poll() {
            Ok(outcome) => {
                summary.relay_writes += outcome.relay_writes().len() as u64;
                for event in &outcome.events {
                    debug!("Bridge event: {:?}", event);
                }
                poll_interval
            }
            Err(e) => {
                summary.failed_cycles += 1;
                warn!("Poll cycle failed: {}; retrying in {:?}", e, backoff);
                backoff
            }
        };

        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Shutdown requested, stopping bridge");
                break;
            }
            _ = sleep(delay) => {}
        }
    }

    info!(
        "Bridge stopped after {} cycles ({} failed, {} relay writes)",
        summary.cycles, summary.failed_cycles, summary.relay_writes
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_protocol::RelayController;
    use relay_sim::{VirtualBus, VirtualDelay, VirtualMixer};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_polls_at_interval() {
        let mixer = VirtualMixer::new("Master", 40);
        let knob = mixer.handle();
        let bridge = VolumeBridge::new(
            mixer,
            RelayController::new(VirtualBus::new(), VirtualDelay::new()),
        );

        let summary = run_bridge(bridge, sleep(Duration::from_millis(350))).await;

        // Cycles at 0, 100, 200 and 300 ms
        assert_eq!(summary.cycles, 4);
        assert_eq!(summary.failed_cycles, 0);
        assert_eq!(summary.relay_writes, 1);
        assert_eq!(knob.events_handled(), 4);
    }
}
