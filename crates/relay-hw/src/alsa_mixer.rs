//! ALSA mixer control
//!
//! Wraps one simple mixer element and presents it as a percentage control.
//! Raw element values are scaled against the element's playback range.

use alsa::mixer::{Mixer as AlsaMixerHandle, Selem, SelemChannelId, SelemId};
use relay_protocol::{Mixer, MixerError, VolumePercent};
use tracing::{debug, info};

use crate::card::SoundCard;
use crate::error::HwError;

/// A named playback control on a sound card
pub struct AlsaMixer {
    mixer: AlsaMixerHandle,
    selem_id: SelemId,
    name: String,
}

impl AlsaMixer {
    /// Open `control` on `card`
    pub fn open(card: &SoundCard, control: &str) -> Result<Self, HwError> {
        let mixer = AlsaMixerHandle::new(&card.hw_name(), false)?;
        let selem_id = SelemId::new(control, 0);

        let found = mixer.find_selem(&selem_id).is_some();
        if !found {
            return Err(HwError::ControlNotFound {
                card: card.id.clone(),
                control: control.to_string(),
            });
        }

        info!(
            "Opened mixer control {} on card {} ({})",
            control,
            card.index,
            card.id
        );
        Ok(Self {
            mixer,
            selem_id,
            name: control.to_string(),
        })
    }

    fn selem(&self) -> Result<Selem<'_>, MixerError> {
        self.mixer
            .find_selem(&self.selem_id)
            .ok_or_else(|| MixerError::Read {
                control: self.name.clone(),
                reason: "control disappeared".to_string(),
            })
    }

    fn read_error(&self, e: alsa::Error) -> MixerError {
        MixerError::Read {
            control: self.name.clone(),
            reason: e.to_string(),
        }
    }
}

impl Mixer for AlsaMixer {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle_events(&mut self) -> Result<(), MixerError> {
        self.mixer
            .handle_events()
            .map(|_| ())
            .map_err(|e| MixerError::Events {
                control: self.name.clone(),
                reason: e.to_string(),
            })
    }

    fn volume(&self) -> Result<i64, MixerError> {
        let selem = self.selem()?;
        let raw = selem
            .get_playback_volume(SelemChannelId::FrontLeft)
            .map_err(|e| self.read_error(e))?;
        Ok(raw_to_percent(raw, selem.get_playback_volume_range()))
    }

    fn set_volume(&mut self, volume: VolumePercent) -> Result<(), MixerError> {
        let selem = self.selem()?;
        let raw = percent_to_raw(volume, selem.get_playback_volume_range());
        debug!("Setting {} to {} (raw {})", self.name, volume, raw);
        selem
            .set_playback_volume_all(raw)
            .map_err(|e| MixerError::Write {
                control: self.name.clone(),
                reason: e.to_string(),
            })
    }

    fn mute(&self) -> Result<bool, MixerError> {
        let selem = self.selem()?;
        if !selem.has_playback_switch() {
            return Err(MixerError::Unsupported {
                control: self.name.clone(),
                feature: "mute".to_string(),
            });
        }
        // Switch on means sound is playing
        let switch = selem
            .get_playback_switch(SelemChannelId::FrontLeft)
            .map_err(|e| self.read_error(e))?;
        Ok(switch == 0)
    }
}

/// Scale a raw element value to percent (rounded)
fn raw_to_percent(raw: i64, (min, max): (i64, i64)) -> i64 {
    if max <= min {
        return 0;
    }
    ((raw - min) as f64 * 100.0 / (max - min) as f64).round() as i64
}

/// Scale a percentage to a raw element value (rounded)
fn percent_to_raw(volume: VolumePercent, (min, max): (i64, i64)) -> i64 {
    min + ((max - min) as f64 * volume.as_u8() as f64 / 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_raw_to_percent() {
        assert_eq!(raw_to_percent(0, (0, 255)), 0);
        assert_eq!(raw_to_percent(255, (0, 255)), 100);
        assert_eq!(raw_to_percent(128, (0, 255)), 50);
        assert_eq!(raw_to_percent(-10, (-20, 0)), 50);
    }

    #[test]
    fn test_raw_to_percent_empty_range() {
        assert_eq!(raw_to_percent(5, (5, 5)), 0);
    }

    #[test]
    fn test_out_of_range_raw_is_passed_through() {
        // Clamping happens in the bridge
        assert_eq!(raw_to_percent(300, (0, 255)), 118);
    }

    #[test]
    fn test_percent_to_raw() {
        assert_eq!(percent_to_raw(VolumePercent::MAX, (0, 255)), 255);
        assert_eq!(percent_to_raw(VolumePercent::MIN, (-20, 0)), -20);
        assert_eq!(percent_to_raw(VolumePercent::new(50).unwrap(), (0, 255)), 128);
    }

    proptest! {
        #[test]
        fn percent_survives_raw_scale(pct in 0u8..=100, max in 100i64..=65535) {
            let volume = VolumePercent::new(pct).unwrap();
            let raw = percent_to_raw(volume, (0, max));
            prop_assert_eq!(raw_to_percent(raw, (0, max)), pct as i64);
        }
    }
}
