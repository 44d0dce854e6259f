//! Relay Volume Simulation Library
//!
//! This crate provides a simulation layer for testing the volume bridge
//! without a sound card or relay board. It includes:
//!
//! - **VirtualMixer**: a mixer control whose volume and mute can be changed
//!   from the test through a [`VirtualMixerHandle`], with fault injection
//! - **VirtualBus**: an I2C bus that records every write
//! - **VirtualDelay**: a delay provider that records requested waits
//!
//! # Example
//!
//! ```rust
//! use relay_protocol::{AttenuationCode, Mixer, RelayController};
//! use relay_sim::{VirtualBus, VirtualDelay, VirtualMixer};
//!
//! let mixer = VirtualMixer::new("Master", 40);
//! let knob = mixer.handle();
//! knob.set_volume(55);
//! assert_eq!(mixer.volume().unwrap(), 55);
//!
//! let bus = VirtualBus::new();
//! let log = bus.handle();
//! let mut relay = RelayController::new(bus, VirtualDelay::new());
//! relay.apply(AttenuationCode::MIN).unwrap();
//! assert_eq!(log.bytes(), vec![0x3F, 0x7F]);
//! ```

pub mod bus;
pub mod mixer;

pub use bus::{BusWrite, VirtualBus, VirtualBusHandle, VirtualDelay, VirtualDelayHandle};
pub use mixer::{VirtualMixer, VirtualMixerHandle};
