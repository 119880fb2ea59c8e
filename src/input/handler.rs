use anyhow::Result;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::{Config, MatrixConfig};
use crate::device::InputEvent;
use crate::keymap::{Actuator, Keycode, Keymap, KeymapEvent, Rotation, KNOB_CHANNEL};
use crate::lighting::{LightingController, LightingMode};

use super::keystrokes::KeystrokeSender;

/// Actuator backed by real keystrokes and the software underglow
pub struct HostActuator {
    keystrokes: KeystrokeSender,
    lighting: LightingController,
    mirror_lighting: bool,
    /// Panel brightness waiting to be pushed to the device
    pending_brightness: Option<u8>,
}

impl HostActuator {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            keystrokes: KeystrokeSender::new()?,
            lighting: LightingController::new(
                config.lighting.initial_state(),
                config.lighting.steps(),
            ),
            mirror_lighting: config.device.mirror_lighting,
            pending_brightness: None,
        })
    }

    pub fn lighting(&self) -> &LightingController {
        &self.lighting
    }

    /// Brightness the panel should follow, once per lighting change
    pub fn take_panel_brightness(&mut self) -> Option<u8> {
        self.pending_brightness.take()
    }

    fn lighting_changed(&mut self) {
        let state = self.lighting.state();
        info!(
            "Lighting: {} {} hsv({}, {}, {})",
            if state.enabled { "on" } else { "off" },
            state.mode,
            state.hue,
            state.saturation,
            state.value
        );
        if self.mirror_lighting {
            self.pending_brightness = Some(self.lighting.panel_brightness());
        }
    }
}

impl Actuator for HostActuator {
    fn emit_keycode(&mut self, code: Keycode) {
        info!("Sending {}", code);
        self.keystrokes.send_keycode(code);
    }

    fn lighting_toggle(&mut self) {
        self.lighting.toggle();
        self.lighting_changed();
    }

    fn lighting_step_mode(&mut self) {
        self.lighting.step_mode();
        self.lighting_changed();
    }

    fn lighting_set_mode(&mut self, mode: LightingMode) {
        self.lighting.set_mode(mode);
        self.lighting_changed();
    }

    fn lighting_adjust_value(&mut self, delta: i8) {
        self.lighting.adjust_value(delta);
        self.lighting_changed();
    }

    fn lighting_adjust_hue(&mut self, delta: i8) {
        self.lighting.adjust_hue(delta);
        self.lighting_changed();
    }
}

/// Translate a device event into a keymap event using the matrix mapping
pub fn translate(matrix: &MatrixConfig, event: InputEvent) -> Option<KeymapEvent> {
    match event {
        InputEvent::ButtonDown(button) => matrix.position_of(button).map(KeymapEvent::Press),
        InputEvent::ButtonUp(button) => matrix.position_of(button).map(KeymapEvent::Release),
        InputEvent::EncoderRotate { encoder, direction } => {
            if encoder != matrix.knob || direction == 0 {
                return None;
            }
            Some(KeymapEvent::Rotate {
                channel: KNOB_CHANNEL,
                rotation: Rotation::from_clockwise(direction > 0),
            })
        }
    }
}

/// Handles input events from the device
pub struct InputHandler {
    keymap: Keymap,
    actuator: HostActuator,
    matrix: MatrixConfig,
}

impl InputHandler {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            keymap: Keymap::from_config(&config.keymap),
            actuator: HostActuator::new(config)?,
            matrix: config.matrix.clone(),
        })
    }

    /// Handle an input event from the device
    pub fn handle_event(&mut self, event: InputEvent) {
        match translate(&self.matrix, event) {
            Some(event) => self
                .keymap
                .handle(event, Instant::now(), &mut self.actuator),
            None => debug!("Unmapped device event: {:?}", event),
        }
    }

    /// Advance the tap-dance clock; call this from the main loop
    pub fn tick(&mut self) {
        self.keymap.tick(Instant::now(), &mut self.actuator);
    }

    pub fn take_panel_brightness(&mut self) -> Option<u8> {
        self.actuator.take_panel_brightness()
    }

    pub fn lighting(&self) -> &LightingController {
        self.actuator.lighting()
    }
}
