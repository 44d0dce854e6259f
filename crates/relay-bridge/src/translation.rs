//! Volume to attenuation code translation
//!
//! The mixer reports 0..=100 percent; the relay bank understands 64 steps.
//! Translation truncates (floor) rather than rounds, so 50% lands on step 31.

use relay_protocol::{AttenuationCode, VolumePercent};

/// Code written while muted
///
/// Same code as 0% volume. Whether 0x00 is actually the silent end of the
/// relay bank depends on the board wiring and has not been verified on
/// hardware.
pub const MUTE_CODE: AttenuationCode = AttenuationCode::MIN;

/// Number of the highest relay step
const MAX_STEP: u32 = AttenuationCode::MAX.as_u8() as u32;

/// Translate a mixer volume and mute flag to a relay code
pub fn translate(volume: VolumePercent, muted: bool) -> AttenuationCode {
    if muted {
        return MUTE_CODE;
    }
    AttenuationCode::saturating(volume.as_u8() as u32 * MAX_STEP / 100)
}
