//! N4/AKP05E device constants
//!
//! Input mapping (button presses):
//!   - Top row:    IDs 1-5  (0x01-0x05) → device buttons 0-4
//!   - Bottom row: IDs 6-10 (0x06-0x0a) → device buttons 5-9
//!
//! Knob rotation:
//!   - 0xa0/0xa1: encoder 0 (leftmost) CCW/CW
//!   - 0x50/0x51: encoder 1 CCW/CW
//!   - 0x90/0x91: encoder 2 CCW/CW
//!   - 0x70/0x71: encoder 3 (rightmost) CCW/CW
//!
//! Knob presses only report the press edge, so the keymap's encoder button
//! is mapped onto a square key instead.

/// Number of addressable buttons (10 square + 4 strip + 1 spare)
pub const BUTTON_COUNT: u8 = 15;

/// Number of rotary encoders
pub const ENCODER_COUNT: u8 = 4;

/// USB Vendor ID for AJAZZ/Mirabox (HOTSPOTEKUSB)
pub const VENDOR_ID: u16 = 0x0300;

/// USB Product ID for AKP05E/N4
pub const PRODUCT_ID: u16 = 0x3004;

/// Encoder index for a rotation event type, with direction (+1 CW, -1 CCW)
#[inline]
pub fn rotation_for_event(event_type: u8) -> Option<(usize, i8)> {
    let encoder = match event_type {
        0xa0 | 0xa1 => 0,
        0x50 | 0x51 => 1,
        0x90 | 0x91 => 2,
        0x70 | 0x71 => 3,
        _ => return None,
    };
    let direction = if event_type & 1 == 1 { 1 } else { -1 };
    Some((encoder, direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_for_event() {
        assert_eq!(rotation_for_event(0xa1), Some((0, 1)));
        assert_eq!(rotation_for_event(0xa0), Some((0, -1)));
        assert_eq!(rotation_for_event(0x50), Some((1, -1)));
        assert_eq!(rotation_for_event(0x91), Some((2, 1)));
        assert_eq!(rotation_for_event(0x70), Some((3, -1)));
        assert_eq!(rotation_for_event(0x05), None);
    }
}
