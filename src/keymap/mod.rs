//! The BigKnob keymap: layout, tap-dance slots and the encoder mode switch

mod action;
pub mod encoder;
pub mod engine;
mod keycode;
pub mod layout;
pub mod tap_dance;
pub mod tracker;

pub use action::{Action, ActionLog, Actuator, Delta};
pub use encoder::{EncoderChannel, EncoderModeSwitch, KnobVariant, Rotation};
pub use engine::{Keymap, KeymapEvent, KNOB_CHANNEL};
pub use keycode::Keycode;
pub use layout::{LayoutEntry, LAYOUT, POSITION_COUNT};
pub use tap_dance::{Gesture, SlotId};
pub use tracker::{GestureEvent, TapDanceTracker, TAPPING_TERM};
