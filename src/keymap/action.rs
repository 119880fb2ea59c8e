use serde::{Deserialize, Serialize};

use super::Keycode;
use crate::lighting::{LightingController, LightingMode};

/// Direction of a lighting adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delta {
    Increase,
    Decrease,
}

impl Delta {
    pub fn sign(self) -> i8 {
        match self {
            Delta::Increase => 1,
            Delta::Decrease => -1,
        }
    }
}

/// Something the keymap asks the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum Action {
    /// Tap a keycode
    Emit(Keycode),
    LightingToggle,
    LightingStepMode,
    LightingSetMode(LightingMode),
    /// Brightness up/down one step
    LightingValue(Delta),
    /// Hue up/down one step
    LightingHue(Delta),
}

impl Action {
    pub fn apply<A: Actuator + ?Sized>(self, actuator: &mut A) {
        match self {
            Action::Emit(code) => actuator.emit_keycode(code),
            Action::LightingToggle => actuator.lighting_toggle(),
            Action::LightingStepMode => actuator.lighting_step_mode(),
            Action::LightingSetMode(mode) => actuator.lighting_set_mode(mode),
            Action::LightingValue(delta) => actuator.lighting_adjust_value(delta.sign()),
            Action::LightingHue(delta) => actuator.lighting_adjust_hue(delta.sign()),
        }
    }
}

/// Host-provided actuation primitives
pub trait Actuator {
    fn emit_keycode(&mut self, code: Keycode);
    fn lighting_toggle(&mut self);
    fn lighting_step_mode(&mut self);
    fn lighting_set_mode(&mut self, mode: LightingMode);
    fn lighting_adjust_value(&mut self, delta: i8);
    fn lighting_adjust_hue(&mut self, delta: i8);
}

/// Actuator that records every primitive call as an [`Action`] and keeps a
/// simulated lighting controller in step with it
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    actions: Vec<Action>,
    lighting: LightingController,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lighting(lighting: LightingController) -> Self {
        Self {
            actions: Vec::new(),
            lighting,
        }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn lighting(&self) -> &LightingController {
        &self.lighting
    }

    /// Drain recorded actions, keeping lighting state
    pub fn take(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }

    pub fn count(&self, action: Action) -> usize {
        self.actions.iter().filter(|&&a| a == action).count()
    }
}

impl Actuator for ActionLog {
    fn emit_keycode(&mut self, code: Keycode) {
        self.actions.push(Action::Emit(code));
    }

    fn lighting_toggle(&mut self) {
        self.lighting.toggle();
        self.actions.push(Action::LightingToggle);
    }

    fn lighting_step_mode(&mut self) {
        self.lighting.step_mode();
        self.actions.push(Action::LightingStepMode);
    }

    fn lighting_set_mode(&mut self, mode: LightingMode) {
        self.lighting.set_mode(mode);
        self.actions.push(Action::LightingSetMode(mode));
    }

    fn lighting_adjust_value(&mut self, delta: i8) {
        self.lighting.adjust_value(delta);
        let delta = if delta >= 0 {
            Delta::Increase
        } else {
            Delta::Decrease
        };
        self.actions.push(Action::LightingValue(delta));
    }

    fn lighting_adjust_hue(&mut self, delta: i8) {
        self.lighting.adjust_hue(delta);
        let delta = if delta >= 0 {
            Delta::Increase
        } else {
            Delta::Decrease
        };
        self.actions.push(Action::LightingHue(delta));
    }
}
