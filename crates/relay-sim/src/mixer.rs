//! Virtual mixer control for testing
//!
//! The bridge takes ownership of its mixers, so the test keeps a
//! [`VirtualMixerHandle`] that shares state with the mixer and can play the
//! part of the user (or another program) turning the knob.

use std::cell::RefCell;
use std::rc::Rc;

use relay_protocol::{Mixer, MixerError, VolumePercent};
use tracing::debug;

#[derive(Debug)]
struct MixerState {
    volume: i64,
    muted: bool,
    mute_supported: bool,
    fail_reads: u32,
    fail_events: u32,
    fail_writes: u32,
    events_handled: u32,
    /// Volumes passed to set_volume (for test verification)
    set_volume_calls: Vec<VolumePercent>,
}

/// Simulated mixer control
pub struct VirtualMixer {
    name: String,
    state: Rc<RefCell<MixerState>>,
}

impl VirtualMixer {
    /// Create an unmuted control at `volume` percent
    pub fn new(name: impl Into<String>, volume: i64) -> Self {
        Self {
            name: name.into(),
            state: Rc::new(RefCell::new(MixerState {
                volume,
                muted: false,
                mute_supported: true,
                fail_reads: 0,
                fail_events: 0,
                fail_writes: 0,
                events_handled: 0,
                set_volume_calls: Vec::new(),
            })),
        }
    }

    /// Get a handle that controls this mixer from the outside
    pub fn handle(&self) -> VirtualMixerHandle {
        VirtualMixerHandle {
            state: Rc::clone(&self.state),
        }
    }

    fn read_failure(&self, what: &str) -> Option<MixerError> {
        let mut state = self.state.borrow_mut();
        if state.fail_reads == 0 {
            return None;
        }
        state.fail_reads -= 1;
        Some(MixerError::Read {
            control: self.name.clone(),
            reason: format!("simulated {} failure", what),
        })
    }
}

impl Mixer for VirtualMixer {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle_events(&mut self) -> Result<(), MixerError> {
        let mut state = self.state.borrow_mut();
        if state.fail_events > 0 {
            state.fail_events -= 1;
            return Err(MixerError::Events {
                control: self.name.clone(),
                reason: "simulated event failure".to_string(),
            });
        }
        state.events_handled += 1;
        Ok(())
    }

    fn volume(&self) -> Result<i64, MixerError> {
        if let Some(err) = self.read_failure("volume read") {
            return Err(err);
        }
        Ok(self.state.borrow().volume)
    }

    fn set_volume(&mut self, volume: VolumePercent) -> Result<(), MixerError> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes > 0 {
            state.fail_writes -= 1;
            return Err(MixerError::Write {
                control: self.name.clone(),
                reason: "simulated write failure".to_string(),
            });
        }
        debug!("Virtual mixer {} set to {}", self.name, volume);
        state.volume = volume.as_u8() as i64;
        state.set_volume_calls.push(volume);
        Ok(())
    }

    fn mute(&self) -> Result<bool, MixerError> {
        if !self.state.borrow().mute_supported {
            return Err(MixerError::Unsupported {
                control: self.name.clone(),
                feature: "mute".to_string(),
            });
        }
        if let Some(err) = self.read_failure("mute read") {
            return Err(err);
        }
        Ok(self.state.borrow().muted)
    }
}

/// Outside control over a [`VirtualMixer`]
#[derive(Clone)]
pub struct VirtualMixerHandle {
    state: Rc<RefCell<MixerState>>,
}

impl VirtualMixerHandle {
    /// Change the raw volume (may be out of range)
    pub fn set_volume(&self, volume: i64) {
        self.state.borrow_mut().volume = volume;
    }

    /// Current raw volume
    pub fn volume(&self) -> i64 {
        self.state.borrow().volume
    }

    /// Change the mute switch
    pub fn set_muted(&self, muted: bool) {
        self.state.borrow_mut().muted = muted;
    }

    /// Make the control behave as if it had no mute switch
    pub fn set_mute_supported(&self, supported: bool) {
        self.state.borrow_mut().mute_supported = supported;
    }

    /// Fail the next `count` volume/mute reads
    pub fn fail_next_reads(&self, count: u32) {
        self.state.borrow_mut().fail_reads = count;
    }

    /// Fail the next `count` event refreshes
    pub fn fail_next_events(&self, count: u32) {
        self.state.borrow_mut().fail_events = count;
    }

    /// Fail the next `count` volume writes
    pub fn fail_next_writes(&self, count: u32) {
        self.state.borrow_mut().fail_writes = count;
    }

    /// Number of successful event refreshes
    pub fn events_handled(&self) -> u32 {
        self.state.borrow().events_handled
    }

    /// Volumes written through the mixer by the code under test
    pub fn set_volume_calls(&self) -> Vec<VolumePercent> {
        self.state.borrow().set_volume_calls.clone()
    }
}
