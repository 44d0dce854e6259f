//! Relay Volume Bridge Engine
//!
//! This crate provides the logic that mirrors a mixer control onto a relay
//! attenuator.
//!
//! # Architecture
//!
//! Each poll cycle moves through three steps:
//!
//! - **Poll**: refresh the input control and read its volume and mute
//! - **Detect change**: compare against the last observed values (unknown on
//!   startup, so the first cycle always applies)
//! - **Apply**: translate to an attenuation code and drive the relay bank
//!
//! Mute transitions are handled before volume transitions, and volume
//! changes are ignored while muted. When an output control is attached, it
//! is reset to its fixed gain whenever it drifts, on every cycle.
//!
//! [`run_bridge`] wraps the cycle in a loop that sleeps 100 ms between
//! cycles and backs off for 1 s after a failed one.
//!
//! # Example
//!
//! ```rust
//! use relay_bridge::VolumeBridge;
//! use relay_protocol::RelayController;
//! use relay_sim::{VirtualBus, VirtualDelay, VirtualMixer};
//!
//! let input = VirtualMixer::new("Master", 50);
//! let output = VirtualMixer::new("Digital", 80);
//! let relay = RelayController::new(VirtualBus::new(), VirtualDelay::new());
//!
//! let mut bridge = VolumeBridge::new(input, relay).with_output(output);
//! let outcome = bridge.poll().unwrap();
//! assert!(outcome.corrected_output());
//! ```

pub mod engine;
pub mod error;
pub mod events;
pub mod runner;
pub mod state;
pub mod translation;

pub use engine::{BridgeConfig, VolumeBridge};
pub use error::BridgeError;
pub use events::{BridgeEvent, PollOutcome};
pub use runner::{run_bridge, RunSummary};
pub use state::BridgeState;
pub use translation::{translate, MUTE_CODE};
