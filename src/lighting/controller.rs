use serde::{Deserialize, Serialize};
use tracing::debug;

use super::LightingMode;

/// Snapshot of the underglow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightingState {
    pub enabled: bool,
    pub mode: LightingMode,
    pub hue: u8,
    pub saturation: u8,
    pub value: u8,
}

impl Default for LightingState {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: LightingMode::StaticLight,
            hue: 0,
            saturation: 255,
            value: 50,
        }
    }
}

/// Increment sizes used by the adjust operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightingSteps {
    pub hue: u8,
    pub value: u8,
    /// Upper bound for value (brightness)
    pub value_limit: u8,
}

impl Default for LightingSteps {
    fn default() -> Self {
        Self {
            hue: 8,
            value: 17,
            value_limit: 255,
        }
    }
}

/// Underglow controller driven by the keymap's lighting actions
#[derive(Debug, Clone)]
pub struct LightingController {
    state: LightingState,
    steps: LightingSteps,
}

impl Default for LightingController {
    fn default() -> Self {
        Self::new(LightingState::default(), LightingSteps::default())
    }
}

impl LightingController {
    pub fn new(mut state: LightingState, steps: LightingSteps) -> Self {
        state.value = state.value.min(steps.value_limit);
        Self { state, steps }
    }

    pub fn state(&self) -> LightingState {
        self.state
    }

    pub fn toggle(&mut self) {
        self.state.enabled = !self.state.enabled;
        debug!(
            "Lighting {}",
            if self.state.enabled { "on" } else { "off" }
        );
    }

    /// Advance to the next effect mode (also switches lighting on)
    pub fn step_mode(&mut self) {
        self.set_mode(self.state.mode.next());
    }

    pub fn set_mode(&mut self, mode: LightingMode) {
        self.state.mode = mode;
        self.state.enabled = true;
        debug!("Lighting mode: {}", mode);
    }

    /// Raise or lower brightness by one step; the sign of `delta` picks the direction
    pub fn adjust_value(&mut self, delta: i8) {
        let value = self.state.value;
        self.state.value = match delta.signum() {
            1 => value.saturating_add(self.steps.value).min(self.steps.value_limit),
            -1 => value.saturating_sub(self.steps.value),
            _ => value,
        };
        debug!("Lighting value: {} -> {}", value, self.state.value);
    }

    /// Rotate hue by one step, wrapping around the colour wheel
    pub fn adjust_hue(&mut self, delta: i8) {
        let hue = self.state.hue;
        self.state.hue = match delta.signum() {
            1 => hue.wrapping_add(self.steps.hue),
            -1 => hue.wrapping_sub(self.steps.hue),
            _ => hue,
        };
        debug!("Lighting hue: {} -> {}", hue, self.state.hue);
    }

    /// Brightness as a panel percentage (0 when lighting is off)
    pub fn panel_brightness(&self) -> u8 {
        if !self.state.enabled {
            return 0;
        }
        ((self.state.value as u16 * 100 + 127) / 255) as u8
    }
}
