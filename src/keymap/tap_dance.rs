//! Tap-dance slots and their tap-count tables

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::{Action, Delta, Keycode};
use crate::lighting::LightingMode;

pub const SLOT_COUNT: usize = 5;

/// Identifies one tap-dance key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotId {
    /// Encoder push button (companion button for the knob)
    EncoderButton,
    HueChange,
    BrightUp,
    BrightDown,
    Rgb,
}

impl SlotId {
    pub const ALL: [SlotId; SLOT_COUNT] = [
        SlotId::EncoderButton,
        SlotId::HueChange,
        SlotId::BrightUp,
        SlotId::BrightDown,
        SlotId::Rgb,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn behavior(self) -> SlotBehavior {
        match self {
            SlotId::EncoderButton => SlotBehavior::Hold,
            SlotId::HueChange => SlotBehavior::Taps(TapTable::new(HUE_CHANGE)),
            SlotId::BrightUp => SlotBehavior::Taps(TapTable::new(BRIGHT_UP)),
            SlotId::BrightDown => SlotBehavior::Taps(TapTable::new(BRIGHT_DOWN)),
            SlotId::Rgb => SlotBehavior::Taps(TapTable::new(RGB)),
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotId::EncoderButton => "TD_ENCODER_BTN",
            SlotId::HueChange => "TD_HUE_CHANGE",
            SlotId::BrightUp => "TD_BRIGHT_UP",
            SlotId::BrightDown => "TD_BRIGHT_DOWN",
            SlotId::Rgb => "TD_RGB",
        };
        f.write_str(name)
    }
}

const HUE_CHANGE: &[Action] = &[
    Action::Emit(Keycode::F13),
    Action::LightingHue(Delta::Increase),
];

const BRIGHT_UP: &[Action] = &[
    Action::Emit(Keycode::F14),
    Action::LightingValue(Delta::Increase),
];

const BRIGHT_DOWN: &[Action] = &[
    Action::Emit(Keycode::F15),
    Action::LightingValue(Delta::Decrease),
];

const RGB: &[Action] = &[
    Action::Emit(Keycode::F16),
    Action::LightingToggle,
    Action::LightingStepMode,
    Action::LightingSetMode(LightingMode::RainbowSwirl),
];

/// A finalized gesture on one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gesture {
    pub slot: SlotId,
    pub count: u8,
    /// Another key was pressed before the window closed
    pub interrupted: bool,
    /// Key was still down when the gesture finished
    pub held: bool,
}

/// Tap count to action mapping; entry `n` is the action for `n + 1` taps
#[derive(Debug, Clone, Copy)]
pub struct TapTable {
    actions: &'static [Action],
}

impl TapTable {
    pub const fn new(actions: &'static [Action]) -> Self {
        Self { actions }
    }

    pub fn max_count(&self) -> u8 {
        self.actions.len() as u8
    }

    pub fn action_for(&self, count: u8) -> Option<Action> {
        let index = usize::from(count).checked_sub(1)?;
        self.actions.get(index).copied()
    }
}

/// How a slot reacts to gestures
#[derive(Debug, Clone, Copy)]
pub enum SlotBehavior {
    /// Dispatch from a tap-count table when the gesture finishes
    Taps(TapTable),
    /// Press/release drive the encoder companion state instead of a table
    Hold,
}

/// Pick the action for a finished gesture, if any
pub fn classify(gesture: &Gesture) -> Option<Action> {
    match gesture.slot.behavior() {
        SlotBehavior::Taps(table) => {
            let action = table.action_for(gesture.count);
            if action.is_none() {
                debug!(
                    "{}: no action for {} taps (max {})",
                    gesture.slot,
                    gesture.count,
                    table.max_count()
                );
            }
            action
        }
        SlotBehavior::Hold => None,
    }
}
