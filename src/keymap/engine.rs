use std::time::{Duration, Instant};
use tracing::{debug, trace};

use super::encoder::{EncoderModeSwitch, KnobVariant, Rotation};
use super::layout::{LayoutEntry, LAYOUT, POSITION_COUNT};
use super::tap_dance::{classify, Gesture, SlotBehavior};
use super::tracker::{GestureEvent, TapDanceTracker};
use super::Actuator;
use crate::config::KeymapConfig;

/// Encoder channel driven by the knob
pub const KNOB_CHANNEL: u8 = 0;

/// One input to the keymap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapEvent {
    Press(usize),
    Release(usize),
    Rotate { channel: u8, rotation: Rotation },
    /// Time passed with no input
    Tick,
}

/// Owns all per-control state and turns input events into actions
#[derive(Debug, Clone)]
pub struct Keymap {
    layout: [LayoutEntry; POSITION_COUNT],
    tracker: TapDanceTracker,
    knob: EncoderModeSwitch,
}

impl Keymap {
    pub fn new(variant: KnobVariant, tapping_term: Duration) -> Self {
        Self {
            layout: LAYOUT,
            tracker: TapDanceTracker::new(tapping_term),
            knob: EncoderModeSwitch::new(variant),
        }
    }

    pub fn from_config(config: &KeymapConfig) -> Self {
        Self::new(config.variant, config.tapping_term())
    }

    pub fn with_layout(mut self, layout: [LayoutEntry; POSITION_COUNT]) -> Self {
        self.layout = layout;
        self
    }

    /// Feed one event. Time-based transitions are checked first.
    pub fn handle<A: Actuator + ?Sized>(
        &mut self,
        event: KeymapEvent,
        now: Instant,
        actuator: &mut A,
    ) {
        self.tick(now, actuator);
        match event {
            KeymapEvent::Press(position) => {
                self.on_key_event(position, true, now, actuator);
            }
            KeymapEvent::Release(position) => {
                self.on_key_event(position, false, now, actuator);
            }
            KeymapEvent::Rotate { channel, rotation } => {
                self.on_rotation(channel, rotation == Rotation::Clockwise, actuator);
            }
            KeymapEvent::Tick => {}
        }
    }

    /// Close any tap-dance window whose term has elapsed
    pub fn tick<A: Actuator + ?Sized>(&mut self, now: Instant, actuator: &mut A) {
        let events = self.tracker.tick(now);
        self.process(events, actuator);
    }

    /// Key press/release at a layout position.
    ///
    /// Returns `false` when the keymap consumed the event and `true` when the
    /// position is unknown and default handling should continue.
    pub fn on_key_event<A: Actuator + ?Sized>(
        &mut self,
        position: usize,
        pressed: bool,
        now: Instant,
        actuator: &mut A,
    ) -> bool {
        let Some(&entry) = self.layout.get(position) else {
            debug!("Ignoring event for unknown position {}", position);
            return true;
        };

        match entry {
            LayoutEntry::Key(code) => {
                if pressed {
                    let events = self.tracker.interrupt();
                    self.process(events, actuator);
                    self.knob.mark_used();
                    actuator.emit_keycode(code);
                }
            }
            LayoutEntry::TapDance(slot) => {
                let hold = matches!(slot.behavior(), SlotBehavior::Hold);
                if pressed {
                    if !hold {
                        self.knob.mark_used();
                    }
                    let events = self.tracker.press(slot, now);
                    self.process(events, actuator);
                    if hold {
                        self.knob.press();
                    }
                } else {
                    if hold {
                        self.knob.release();
                    }
                    let events = self.tracker.release(slot, now);
                    self.process(events, actuator);
                }
            }
        }

        false
    }

    /// Encoder detent. Returns `true` for channels this keymap does not drive.
    pub fn on_rotation<A: Actuator + ?Sized>(
        &mut self,
        channel: u8,
        clockwise: bool,
        actuator: &mut A,
    ) -> bool {
        if channel != KNOB_CHANNEL {
            debug!("Ignoring rotation on encoder {}", channel);
            return true;
        }

        let action = self.knob.rotate(Rotation::from_clockwise(clockwise));
        trace!("Encoder {}: {:?}", channel, action);
        action.apply(actuator);
        false
    }

    /// Dispatch a finished gesture from its slot's tap table
    pub fn on_gesture_finished<A: Actuator + ?Sized>(
        &mut self,
        gesture: Gesture,
        actuator: &mut A,
    ) {
        if let Some(action) = classify(&gesture) {
            debug!(
                "{} x{}{}: {:?}",
                gesture.slot,
                gesture.count,
                if gesture.interrupted {
                    " (interrupted)"
                } else {
                    ""
                },
                action
            );
            action.apply(actuator);
        }
    }

    /// The hold-capable slot fires its release action once its gesture ends
    fn on_gesture_reset<A: Actuator + ?Sized>(&mut self, gesture: Gesture, actuator: &mut A) {
        trace!("{} reset", gesture.slot);
        if !matches!(gesture.slot.behavior(), SlotBehavior::Hold) {
            return;
        }
        if let Some(action) = self.knob.end_gesture(&gesture) {
            debug!("{} released as tap: {:?}", gesture.slot, action);
            action.apply(actuator);
        }
    }

    fn process<A: Actuator + ?Sized>(&mut self, events: Vec<GestureEvent>, actuator: &mut A) {
        for event in events {
            match event {
                GestureEvent::Finished(gesture) => self.on_gesture_finished(gesture, actuator),
                GestureEvent::Reset(gesture) => self.on_gesture_reset(gesture, actuator),
            }
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}
