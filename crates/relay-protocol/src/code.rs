//! Attenuation codes and mixer volume values
//!
//! Both types are small validated wrappers: an [`AttenuationCode`] can only
//! hold a 6-bit value and a [`VolumePercent`] can only hold 0..=100.

use std::fmt;

use crate::error::ProtocolError;

/// Bits of the relay byte that carry the attenuation step
const CODE_MASK: u8 = 0x3F;

/// Hardware attenuation step (0x00..=0x3F)
///
/// 0x00 is the minimum attenuation index; higher values switch in more
/// resistive steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttenuationCode(u8);

impl AttenuationCode {
    /// Smallest code
    pub const MIN: Self = Self(0x00);
    /// Largest code
    pub const MAX: Self = Self(CODE_MASK);

    /// Create a code, rejecting values that do not fit in six bits
    pub fn new(value: u8) -> Result<Self, ProtocolError> {
        if value > CODE_MASK {
            return Err(ProtocolError::InvalidCode(value));
        }
        Ok(Self(value))
    }

    /// Create a code from a wider value, saturating at the range ends
    pub fn saturating(value: u32) -> Self {
        Self(value.min(CODE_MASK as u32) as u8)
    }

    /// Get the raw code value
    pub const fn as_u8(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for AttenuationCode {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for AttenuationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Mixer volume in percent (0..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VolumePercent(u8);

impl VolumePercent {
    /// Silent
    pub const MIN: Self = Self(0);
    /// Full scale
    pub const MAX: Self = Self(100);

    /// Create a percentage, rejecting values above 100
    pub fn new(value: u8) -> Result<Self, ProtocolError> {
        if value > Self::MAX.0 {
            return Err(ProtocolError::InvalidPercent(value as i64));
        }
        Ok(Self(value))
    }

    /// Clamp a raw mixer reading into range
    ///
    /// Drivers occasionally report values outside 0..=100; these are pinned
    /// to the nearest end rather than rejected.
    pub fn clamped(raw: i64) -> Self {
        Self(raw.clamp(0, 100) as u8)
    }

    /// Get the raw percentage
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for VolumePercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Physical byte for a code: the relay lines are active low and bit 6 is
/// always set.
pub fn relay_byte(code: AttenuationCode) -> u8 {
    (!code.0 & CODE_MASK) | crate::relay::CONTROL_BIT
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_code_range() {
        assert!(AttenuationCode::new(0x00).is_ok());
        assert!(AttenuationCode::new(0x3F).is_ok());
        assert_eq!(
            AttenuationCode::new(0x40),
            Err(ProtocolError::InvalidCode(0x40))
        );
    }

    #[test]
    fn test_code_saturating() {
        assert_eq!(AttenuationCode::saturating(12), AttenuationCode(12));
        assert_eq!(AttenuationCode::saturating(500), AttenuationCode::MAX);
    }

    #[test]
    fn test_relay_byte_extremes() {
        assert_eq!(relay_byte(AttenuationCode::MIN), 0x7F);
        assert_eq!(relay_byte(AttenuationCode::MAX), 0x40);
        assert_eq!(relay_byte(AttenuationCode(31)), 0x60);
    }

    #[test]
    fn test_percent_clamped() {
        assert_eq!(VolumePercent::clamped(-5), VolumePercent::MIN);
        assert_eq!(VolumePercent::clamped(120), VolumePercent::MAX);
        assert_eq!(VolumePercent::clamped(42).as_u8(), 42);
        assert!(VolumePercent::new(101).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(AttenuationCode(0x0A).to_string(), "0x0A");
        assert_eq!(VolumePercent(75).to_string(), "75%");
    }

    proptest! {
        #[test]
        fn relay_byte_keeps_control_bit_and_inverts(raw in 0u8..=0x3F) {
            let code = AttenuationCode::new(raw).unwrap();
            let byte = relay_byte(code);

            prop_assert_eq!(byte & 0xC0, 0x40);
            prop_assert_eq!(!byte & 0x3F, raw);
        }
    }
}
