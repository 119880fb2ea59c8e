use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::keymap::{KnobVariant, POSITION_COUNT};
use crate::lighting::{LightingMode, LightingState, LightingSteps};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub keymap: KeymapConfig,
    pub lighting: LightingConfig,
    pub matrix: MatrixConfig,
}

impl Config {
    /// Load configuration from file or create default
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            // Create default config
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join(".config/bigknob/config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Panel brightness at startup (0-100)
    pub brightness: u8,
    /// Seconds between keep-alive packets
    pub keepalive_secs: u64,
    /// Follow the underglow's on/off state and value with panel brightness
    pub mirror_lighting: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            brightness: 80,
            keepalive_secs: 10,
            mirror_lighting: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeymapConfig {
    /// What a plain tap of the encoder button does
    pub variant: KnobVariant,
    /// Tap-dance window in milliseconds
    pub tapping_term_ms: u64,
}

impl KeymapConfig {
    pub fn tapping_term(&self) -> Duration {
        Duration::from_millis(self.tapping_term_ms)
    }
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            variant: KnobVariant::default(),
            tapping_term_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub enabled: bool,
    pub mode: LightingMode,
    pub hue: u8,
    pub saturation: u8,
    pub value: u8,
    pub hue_step: u8,
    pub value_step: u8,
    pub value_limit: u8,
}

impl LightingConfig {
    pub fn initial_state(&self) -> LightingState {
        LightingState {
            enabled: self.enabled,
            mode: self.mode,
            hue: self.hue,
            saturation: self.saturation,
            value: self.value,
        }
    }

    pub fn steps(&self) -> LightingSteps {
        LightingSteps {
            hue: self.hue_step,
            value: self.value_step,
            value_limit: self.value_limit,
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        let state = LightingState::default();
        let steps = LightingSteps::default();
        Self {
            enabled: state.enabled,
            mode: state.mode,
            hue: state.hue,
            saturation: state.saturation,
            value: state.value,
            hue_step: steps.hue,
            value_step: steps.value,
            value_limit: steps.value_limit,
        }
    }
}

/// Which device inputs stand in for the keymap's keys and knob
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Device button id for each layout position
    pub buttons: Vec<u8>,
    /// Device encoder used as the knob
    pub knob: u8,
}

impl MatrixConfig {
    /// Layout position for a device button
    pub fn position_of(&self, button: u8) -> Option<usize> {
        self.buttons
            .iter()
            .take(POSITION_COUNT)
            .position(|&b| b == button)
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            // Top row of the AKP05E, left to right
            buttons: vec![0, 1, 2, 3, 4],
            knob: 0,
        }
    }
}
