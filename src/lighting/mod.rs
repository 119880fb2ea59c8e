//! Software model of the RGB underglow
//!
//! Mirrors the lighting controller the keymap drives: an on/off flag, the
//! current effect mode and an HSV colour. Step sizes match the firmware
//! defaults (hue 8, value 17).

mod controller;

pub use controller::{LightingController, LightingState, LightingSteps};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lighting effect modes, in the order `step_mode` cycles through them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingMode {
    #[default]
    StaticLight,
    Breathing,
    RainbowMood,
    RainbowSwirl,
    Snake,
    Knight,
    Christmas,
    StaticGradient,
    RgbTest,
    Alternating,
    Twinkle,
}

impl LightingMode {
    pub const ALL: [LightingMode; 11] = [
        LightingMode::StaticLight,
        LightingMode::Breathing,
        LightingMode::RainbowMood,
        LightingMode::RainbowSwirl,
        LightingMode::Snake,
        LightingMode::Knight,
        LightingMode::Christmas,
        LightingMode::StaticGradient,
        LightingMode::RgbTest,
        LightingMode::Alternating,
        LightingMode::Twinkle,
    ];

    /// Next mode in cycle order, wrapping back to static light
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for LightingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LightingMode::StaticLight => "static light",
            LightingMode::Breathing => "breathing",
            LightingMode::RainbowMood => "rainbow mood",
            LightingMode::RainbowSwirl => "rainbow swirl",
            LightingMode::Snake => "snake",
            LightingMode::Knight => "knight",
            LightingMode::Christmas => "christmas",
            LightingMode::StaticGradient => "static gradient",
            LightingMode::RgbTest => "rgb test",
            LightingMode::Alternating => "alternating",
            LightingMode::Twinkle => "twinkle",
        };
        f.write_str(name)
    }
}
