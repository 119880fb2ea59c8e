use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tap_dance::Gesture;
use super::{Action, Delta, Keycode};

/// Rotation direction of one encoder detent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    #[serde(rename = "cw", alias = "clockwise")]
    Clockwise,
    #[serde(rename = "ccw", alias = "counterclockwise")]
    CounterClockwise,
}

impl Rotation {
    pub fn from_clockwise(clockwise: bool) -> Self {
        if clockwise {
            Rotation::Clockwise
        } else {
            Rotation::CounterClockwise
        }
    }

    /// Clockwise always increases
    pub fn delta(self) -> Delta {
        match self {
            Rotation::Clockwise => Delta::Increase,
            Rotation::CounterClockwise => Delta::Decrease,
        }
    }
}

/// What a plain tap of the encoder button does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnobVariant {
    /// Send F24
    Keycode,
    /// Toggle the underglow
    #[default]
    Toggle,
}

impl KnobVariant {
    pub fn release_action(self) -> Action {
        match self {
            KnobVariant::Keycode => Action::Emit(Keycode::F24),
            KnobVariant::Toggle => Action::LightingToggle,
        }
    }
}

/// Hold state of the encoder's companion button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncoderChannel {
    pub held: bool,
    /// Something happened while held, so the release action is suppressed
    pub used: bool,
}

/// Selects between volume and brightness control for one encoder
#[derive(Debug, Clone, Default)]
pub struct EncoderModeSwitch {
    channel: EncoderChannel,
    variant: KnobVariant,
}

impl EncoderModeSwitch {
    pub fn new(variant: KnobVariant) -> Self {
        Self {
            channel: EncoderChannel::default(),
            variant,
        }
    }

    pub fn press(&mut self) {
        self.channel.held = true;
    }

    pub fn release(&mut self) {
        self.channel.held = false;
    }

    /// Another key went down; a held button no longer counts as a plain tap
    pub fn mark_used(&mut self) {
        if self.channel.held {
            self.channel.used = true;
        }
    }

    pub fn rotate(&mut self, rotation: Rotation) -> Action {
        if self.channel.held {
            self.channel.used = true;
            Action::LightingValue(rotation.delta())
        } else {
            match rotation {
                Rotation::Clockwise => Action::Emit(Keycode::VolumeUp),
                Rotation::CounterClockwise => Action::Emit(Keycode::VolumeDown),
            }
        }
    }

    /// The button's tap-dance gesture was reset. Returns the release action
    /// when the gesture was a single, uninterrupted, unused tap.
    pub fn end_gesture(&mut self, gesture: &Gesture) -> Option<Action> {
        let used = self.channel.used;
        self.channel = EncoderChannel::default();

        if gesture.count != 1 || gesture.interrupted {
            debug!(
                "Encoder button gesture x{} (interrupted: {}), no release action",
                gesture.count, gesture.interrupted
            );
            None
        } else if used {
            debug!("Encoder button released after use, skipping release action");
            None
        } else {
            Some(self.variant.release_action())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::SlotId;

    fn gesture(count: u8, interrupted: bool) -> Gesture {
        Gesture {
            slot: SlotId::EncoderButton,
            count,
            interrupted,
            held: false,
        }
    }

    #[test]
    fn test_plain_tap_produces_release_action() {
        let mut knob = EncoderModeSwitch::new(KnobVariant::Toggle);
        knob.press();
        knob.release();
        assert_eq!(
            knob.end_gesture(&gesture(1, false)),
            Some(Action::LightingToggle)
        );
        assert_eq!(knob.channel, EncoderChannel::default());

        let mut knob = EncoderModeSwitch::new(KnobVariant::Keycode);
        knob.press();
        knob.release();
        assert_eq!(
            knob.end_gesture(&gesture(1, false)),
            Some(Action::Emit(Keycode::F24))
        );
    }

    #[test]
    fn test_hold_and_rotate_suppresses_release() {
        let mut knob = EncoderModeSwitch::default();
        knob.press();
        assert_eq!(
            knob.rotate(Rotation::Clockwise),
            Action::LightingValue(Delta::Increase)
        );
        assert_eq!(
            knob.rotate(Rotation::CounterClockwise),
            Action::LightingValue(Delta::Decrease)
        );
        assert!(knob.channel.used);
        knob.release();
        assert_eq!(knob.end_gesture(&gesture(1, false)), None);

        // Next session starts clean
        knob.press();
        knob.release();
        assert_eq!(
            knob.end_gesture(&gesture(1, false)),
            Some(Action::LightingToggle)
        );
    }

    #[test]
    fn test_rotation_without_hold_is_volume() {
        let mut knob = EncoderModeSwitch::default();
        assert_eq!(
            knob.rotate(Rotation::Clockwise),
            Action::Emit(Keycode::VolumeUp)
        );
        assert_eq!(
            knob.rotate(Rotation::CounterClockwise),
            Action::Emit(Keycode::VolumeDown)
        );
        assert!(!knob.channel.used);
    }

    #[test]
    fn test_mark_used_needs_hold() {
        let mut knob = EncoderModeSwitch::default();
        knob.mark_used();
        assert!(!knob.channel.used);

        knob.press();
        knob.mark_used();
        knob.release();
        assert_eq!(knob.end_gesture(&gesture(1, false)), None);
    }

    #[test]
    fn test_only_single_uninterrupted_tap_fires() {
        let mut knob = EncoderModeSwitch::default();
        for count in [0, 2, 3] {
            assert_eq!(knob.end_gesture(&gesture(count, false)), None, "x{count}");
        }
        assert_eq!(knob.end_gesture(&gesture(1, true)), None);
    }

    #[test]
    fn test_rotation_deserializes_short_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            rotate: Rotation,
        }
        let w: Wrapper = toml::from_str(r#"rotate = "ccw""#).unwrap();
        assert_eq!(w.rotate, Rotation::CounterClockwise);
        let w: Wrapper = toml::from_str(r#"rotate = "clockwise""#).unwrap();
        assert_eq!(w.rotate, Rotation::Clockwise);
    }
}
