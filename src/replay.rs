//! Scripted event replay
//!
//! Runs a sequence of timed key and knob events through a fresh keymap and
//! records what it dispatches. Scripts are TOML:
//!
//! ```toml
//! [[event]]
//! at_ms = 0
//! press = 0
//!
//! [[event]]
//! at_ms = 300
//! rotate = "cw"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::Config;
use crate::keymap::{
    Action, ActionLog, Actuator, Keycode, Keymap, KeymapEvent, Rotation, POSITION_COUNT,
};
use crate::lighting::{LightingController, LightingMode, LightingState};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid script: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("event {index}: position {position} is not on the layout")]
    UnknownPosition { index: usize, position: usize },
    #[error("event {index}: at_ms {at_ms} is earlier than the previous event ({previous})")]
    OutOfOrder {
        index: usize,
        at_ms: u64,
        previous: u64,
    },
    #[error("event {index}: expected exactly one of press, release or rotate")]
    Ambiguous { index: usize },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(rename = "event", default)]
    pub events: Vec<ScriptEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptEvent {
    pub at_ms: u64,
    pub press: Option<usize>,
    pub release: Option<usize>,
    pub rotate: Option<Rotation>,
    #[serde(default)]
    pub channel: u8,
}

impl ScriptEvent {
    fn to_keymap_event(&self, index: usize) -> Result<KeymapEvent, ReplayError> {
        let event = match (self.press, self.release, self.rotate) {
            (Some(position), None, None) => KeymapEvent::Press(position),
            (None, Some(position), None) => KeymapEvent::Release(position),
            (None, None, Some(rotation)) => KeymapEvent::Rotate {
                channel: self.channel,
                rotation,
            },
            _ => return Err(ReplayError::Ambiguous { index }),
        };

        if let KeymapEvent::Press(position) | KeymapEvent::Release(position) = event {
            if position >= POSITION_COUNT {
                return Err(ReplayError::UnknownPosition { index, position });
            }
        }
        Ok(event)
    }
}

impl Script {
    pub fn parse(text: &str) -> Result<Self, ReplayError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Check ordering and event shape, returning the keymap events
    pub fn validate(&self) -> Result<Vec<(u64, KeymapEvent)>, ReplayError> {
        let mut previous = 0;
        self.events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                if event.at_ms < previous {
                    return Err(ReplayError::OutOfOrder {
                        index,
                        at_ms: event.at_ms,
                        previous,
                    });
                }
                previous = event.at_ms;
                Ok((event.at_ms, event.to_keymap_event(index)?))
            })
            .collect()
    }
}

/// One dispatched action and when it happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimedAction {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub actions: Vec<TimedAction>,
    pub lighting: LightingState,
}

impl ReplayReport {
    pub fn actions(&self) -> Vec<Action> {
        self.actions.iter().map(|a| a.action).collect()
    }
}

/// Records actions with the script time they happened at
struct ReplayActuator {
    log: ActionLog,
    now_ms: u64,
    timed: Vec<TimedAction>,
}

impl ReplayActuator {
    fn record(&mut self) {
        let now_ms = self.now_ms;
        self.timed.extend(
            self.log
                .take()
                .into_iter()
                .map(|action| TimedAction { at_ms: now_ms, action }),
        );
    }
}

impl Actuator for ReplayActuator {
    fn emit_keycode(&mut self, code: Keycode) {
        self.log.emit_keycode(code);
        self.record();
    }

    fn lighting_toggle(&mut self) {
        self.log.lighting_toggle();
        self.record();
    }

    fn lighting_step_mode(&mut self) {
        self.log.lighting_step_mode();
        self.record();
    }

    fn lighting_set_mode(&mut self, mode: LightingMode) {
        self.log.lighting_set_mode(mode);
        self.record();
    }

    fn lighting_adjust_value(&mut self, delta: i8) {
        self.log.lighting_adjust_value(delta);
        self.record();
    }

    fn lighting_adjust_hue(&mut self, delta: i8) {
        self.log.lighting_adjust_hue(delta);
        self.record();
    }
}

/// Run a script against a fresh keymap built from `config`
pub fn run(script: &Script, config: &Config) -> Result<ReplayReport, ReplayError> {
    let events = script.validate()?;

    let mut keymap = Keymap::from_config(&config.keymap);
    let mut actuator = ReplayActuator {
        log: ActionLog::with_lighting(LightingController::new(
            config.lighting.initial_state(),
            config.lighting.steps(),
        )),
        now_ms: 0,
        timed: Vec::new(),
    };

    let start = Instant::now();
    let at = |ms: u64| start + Duration::from_millis(ms);

    for (at_ms, event) in &events {
        actuator.now_ms = *at_ms;
        keymap.handle(*event, at(*at_ms), &mut actuator);
    }

    // Let any open tap-dance window close
    let last = events.last().map_or(0, |(at_ms, _)| *at_ms);
    let end = last + config.keymap.tapping_term_ms;
    actuator.now_ms = end;
    keymap.tick(at(end), &mut actuator);

    Ok(ReplayReport {
        actions: actuator.timed,
        lighting: actuator.log.lighting().state(),
    })
}
