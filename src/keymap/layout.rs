use serde::{Deserialize, Serialize};
use std::fmt;

use super::tap_dance::SlotId;
use super::Keycode;

/// Number of physical keys
pub const POSITION_COUNT: usize = 5;

/// What a physical key position does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutEntry {
    Key(Keycode),
    TapDance(SlotId),
}

impl fmt::Display for LayoutEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutEntry::Key(code) => write!(f, "{}", code),
            LayoutEntry::TapDance(slot) => write!(f, "TD({})", slot),
        }
    }
}

/// The single layer; position 0 is the key closest to USB
pub const LAYOUT: [LayoutEntry; POSITION_COUNT] = [
    LayoutEntry::TapDance(SlotId::EncoderButton),
    LayoutEntry::TapDance(SlotId::HueChange),
    LayoutEntry::TapDance(SlotId::BrightUp),
    LayoutEntry::TapDance(SlotId::BrightDown),
    LayoutEntry::TapDance(SlotId::Rgb),
];

/// Key descriptions for `--layout`
pub const POSITION_DESCRIPTIONS: [&str; POSITION_COUNT] = [
    "Encoder button - tap for release action, hold while turning for brightness",
    "F13 on single tap, hue up on double tap",
    "F14 on single tap, brightness up on double tap",
    "F15 on single tap, brightness down on double tap",
    "F16 on single tap, toggle on double, next mode on triple, rainbow swirl on quad",
];

/// Encoder descriptions for `--layout`
pub const ENCODER_DESCRIPTIONS: [&str; 1] =
    ["Volume up/down; brightness up/down while the encoder button is held"];
