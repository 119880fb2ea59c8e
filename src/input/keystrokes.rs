use anyhow::{anyhow, Result};
use enigo::{Direction, Enigo, Key as EnigoKey, Keyboard, Settings};
use tracing::{debug, warn};

use crate::keymap::Keycode;

/// Map a keymap keycode onto an enigo key
pub fn enigo_key(code: Keycode) -> Option<EnigoKey> {
    let key = match code {
        Keycode::F13 => EnigoKey::F13,
        Keycode::F14 => EnigoKey::F14,
        Keycode::F15 => EnigoKey::F15,
        Keycode::F16 => EnigoKey::F16,
        Keycode::F17 => EnigoKey::F17,
        Keycode::F18 => EnigoKey::F18,
        Keycode::F19 => EnigoKey::F19,
        Keycode::F20 => EnigoKey::F20,
        #[cfg(not(target_os = "macos"))]
        Keycode::F21 => EnigoKey::F21,
        #[cfg(not(target_os = "macos"))]
        Keycode::F22 => EnigoKey::F22,
        #[cfg(not(target_os = "macos"))]
        Keycode::F23 => EnigoKey::F23,
        #[cfg(not(target_os = "macos"))]
        Keycode::F24 => EnigoKey::F24,
        #[cfg(target_os = "macos")]
        Keycode::F21 | Keycode::F22 | Keycode::F23 | Keycode::F24 => return None,
        Keycode::VolumeUp => EnigoKey::VolumeUp,
        Keycode::VolumeDown => EnigoKey::VolumeDown,
        Keycode::Mute => EnigoKey::VolumeMute,
        Keycode::Enter => EnigoKey::Return,
        Keycode::Escape => EnigoKey::Escape,
        Keycode::Tab => EnigoKey::Tab,
        Keycode::Space => EnigoKey::Space,
    };
    Some(key)
}

/// Sends keystrokes to the focused window
pub struct KeystrokeSender {
    enigo: Enigo,
}

impl KeystrokeSender {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow!("Failed to initialize Enigo: {}", e))?;
        Ok(Self { enigo })
    }

    /// Tap a keycode
    pub fn send_keycode(&mut self, code: Keycode) {
        let Some(key) = enigo_key(code) else {
            warn!("{} has no equivalent on this platform", code);
            return;
        };

        debug!("Sending key: {:?}", key);
        if let Err(e) = self.enigo.key(key, Direction::Click) {
            warn!("Failed to send {}: {}", code, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_keys_map_directly() {
        assert_eq!(enigo_key(Keycode::F13), Some(EnigoKey::F13));
        assert_eq!(enigo_key(Keycode::F16), Some(EnigoKey::F16));
    }

    #[test]
    fn test_media_keys() {
        assert_eq!(enigo_key(Keycode::VolumeUp), Some(EnigoKey::VolumeUp));
        assert_eq!(enigo_key(Keycode::VolumeDown), Some(EnigoKey::VolumeDown));
        assert_eq!(enigo_key(Keycode::Mute), Some(EnigoKey::VolumeMute));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_high_function_keys() {
        assert_eq!(enigo_key(Keycode::F24), Some(EnigoKey::F24));
    }
}
