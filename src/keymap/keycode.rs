use serde::{Deserialize, Serialize};
use std::fmt;

/// Keycodes emitted by the keymap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keycode {
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
    F21,
    F22,
    F23,
    F24,
    VolumeUp,
    VolumeDown,
    Mute,
    Enter,
    Escape,
    Tab,
    Space,
}

impl Keycode {
    /// Firmware-style name, as printed in layout listings
    pub fn qmk_name(self) -> &'static str {
        match self {
            Keycode::F13 => "KC_F13",
            Keycode::F14 => "KC_F14",
            Keycode::F15 => "KC_F15",
            Keycode::F16 => "KC_F16",
            Keycode::F17 => "KC_F17",
            Keycode::F18 => "KC_F18",
            Keycode::F19 => "KC_F19",
            Keycode::F20 => "KC_F20",
            Keycode::F21 => "KC_F21",
            Keycode::F22 => "KC_F22",
            Keycode::F23 => "KC_F23",
            Keycode::F24 => "KC_F24",
            Keycode::VolumeUp => "KC_VOLU",
            Keycode::VolumeDown => "KC_VOLD",
            Keycode::Mute => "KC_MUTE",
            Keycode::Enter => "KC_ENT",
            Keycode::Escape => "KC_ESC",
            Keycode::Tab => "KC_TAB",
            Keycode::Space => "KC_SPC",
        }
    }
}

impl fmt::Display for Keycode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qmk_name())
    }
}
