//! Wire-level constants and bit packing.
//!
//! ```text
//! ┌────────────────┬───────┬────────────────────┬─────────────┐
//! │ Byte role      │ Bit 7 │ Bits 6..1          │ Bit 0       │
//! ├────────────────┼───────┼────────────────────┼─────────────┤
//! │ Channel marker │ 1     │ channel (0-63)     │ unused      │
//! │ MSB data byte  │ 0     │ value bits 9..6    │ unused      │
//! │ LSB data byte  │ 0     │ value bits 5..0    │ padding (1) │
//! └────────────────┴───────┴────────────────────┴─────────────┘
//! ```
//!
//! Bit 7 of the data bytes is never inspected by the decoder.

/// Bit 7 flags a channel marker byte.
pub const MARKER_BIT: u8 = 0b1000_0000;

/// Channel bits of a marker byte, after shifting right by one.
pub const CHANNEL_MASK: u8 = 0b0011_1111;

/// Value bits 9..6 as they sit in the MSB data byte.
pub const MSB_MASK: u8 = 0b0001_1110;

/// Value bits 5..0 of the LSB data byte, after shifting right by one.
pub const LSB_MASK: u8 = 0b0011_1111;

/// Padding bit the sensor sets on every LSB data byte.
pub const LSB_PADDING: u8 = 0b0000_0001;

/// Bytes per frame: marker + MSB + LSB.
pub const FRAME_SIZE: usize = 3;

/// Number of logical sensor inputs.
pub const CHANNEL_COUNT: usize = 64;

/// Highest valid channel number.
pub const MAX_CHANNEL: u8 = 63;

/// Highest valid 10-bit reading.
pub const MAX_VALUE: u16 = 1023;

/// A decoded (channel, value) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reading {
    /// Sensor input, 0-63.
    pub channel: u8,
    /// 10-bit sample, 0-1023.
    pub value: u16,
}

impl Reading {
    /// Create a reading. Range checks happen at encode time.
    pub fn new(channel: u8, value: u16) -> Self {
        Self { channel, value }
    }

    /// Slot index of this reading inside a 64-value sweep.
    pub fn slot(&self) -> usize {
        usize::from(self.channel)
    }
}

/// Returns true if `byte` starts a frame.
pub fn is_marker(byte: u8) -> bool {
    byte & MARKER_BIT == MARKER_BIT
}

/// Extract the channel number carried by a marker byte.
pub fn channel_from_marker(byte: u8) -> u8 {
    (byte >> 1) & CHANNEL_MASK
}

/// Rebuild the 10-bit value from the two data bytes.
pub fn value_from_data(msb: u8, lsb: u8) -> u16 {
    let high = u16::from((msb & MSB_MASK) >> 1) << 6;
    let low = u16::from((lsb >> 1) & LSB_MASK);
    high | low
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_detection_only_checks_high_bit() {
        assert!(is_marker(0x80));
        assert!(is_marker(0xFF));
        assert!(!is_marker(0x7F));
        assert!(!is_marker(0x00));
    }

    #[test]
    fn channel_ignores_bit_zero() {
        assert_eq!(channel_from_marker(0b1000_0000), 0);
        assert_eq!(channel_from_marker(0b1000_0001), 0);
        assert_eq!(channel_from_marker(0b1111_1110), 63);
        assert_eq!(channel_from_marker(0b1111_1111), 63);
        assert_eq!(channel_from_marker(0b1000_0110), 3);
    }

    #[test]
    fn value_extremes() {
        assert_eq!(value_from_data(0b0000_0000, 0b0000_0000), 0);
        assert_eq!(value_from_data(0b0001_1110, 0b0111_1111), MAX_VALUE);
    }

    #[test]
    fn value_ignores_unused_bits() {
        // bit 0 and bits 7..5 of the msb, bit 7 of the lsb are not payload
        assert_eq!(value_from_data(0b1110_0001, 0b1000_0001), 0);
        assert_eq!(value_from_data(0b0000_0010, 0b0000_0000), 1 << 6);
        assert_eq!(value_from_data(0b0000_0000, 0b0000_0011), 1);
    }

    #[test]
    fn reading_slot_matches_channel() {
        assert_eq!(Reading::new(42, 7).slot(), 42);
    }
}
