//! Game settings and preferences
//!
//! Loaded from JSON by the host. The simulation only reads these.

use serde::{Deserialize, Serialize};

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Nightmare,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Nightmare => "Nightmare",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "nightmare" => Some(Difficulty::Nightmare),
            _ => None,
        }
    }

    /// Multiplier on every standard enemy's movement speed
    pub fn enemy_speed_modifier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.2,
            Difficulty::Nightmare => 1.45,
        }
    }

    /// Multiplier on spawned enemy health
    pub fn enemy_health_modifier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.35,
            Difficulty::Nightmare => 1.8,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty preset
    pub difficulty: Difficulty,

    // === Camera ===
    /// Follow smoothing rate (higher = snappier)
    pub camera_smoothing: f32,
    /// Reduced motion (camera snaps instead of easing)
    pub reduced_motion: bool,

    // === Feedback ===
    /// Emit damage-number events
    pub show_damage_numbers: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            camera_smoothing: crate::consts::CAMERA_FOLLOW_RATE,
            reduced_motion: false,
            show_damage_numbers: true,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse settings, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings ({})", settings.difficulty.as_str());
                settings
            }
            Err(err) => {
                log::warn!("Invalid settings JSON ({err}), using defaults");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Effective camera follow rate (reduced motion snaps)
    pub fn effective_camera_smoothing(&self) -> Option<f32> {
        if self.reduced_motion {
            None
        } else {
            Some(self.camera_smoothing.max(0.0))
        }
    }
}
