//! Linux Hardware Backends
//!
//! This crate connects the bridge to real hardware:
//!
//! - **Sound cards**: enumerate ALSA cards and find the DAC by name
//! - **AlsaMixer**: a [`relay_protocol::Mixer`] backed by an ALSA simple
//!   mixer element
//! - **Relay bus**: open `/dev/i2c-*` and wrap it in a
//!   [`relay_protocol::RelayController`]
//!
//! # Example
//!
//! ```rust,no_run
//! use relay_hw::{find_card, open_relay, AlsaMixer};
//!
//! let card = find_card("BossDAC").unwrap();
//! let master = AlsaMixer::open(&card, "Master").unwrap();
//! let relay = open_relay("/dev/i2c-1", relay_protocol::RELAY_ADDR).unwrap();
//! ```

pub mod alsa_mixer;
pub mod card;
pub mod error;
pub mod i2c;

pub use alsa_mixer::AlsaMixer;
pub use card::{enumerate_cards, find_card, SoundCard};
pub use error::HwError;
pub use i2c::{open_relay, LinuxRelay};
