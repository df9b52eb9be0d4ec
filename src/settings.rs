//! Game settings and preferences
//!
//! Persisted separately from gameplay tuning as a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Silence all cues
    pub muted: bool,

    // === Display ===
    /// Frame rate cap; one simulation tick runs per frame
    pub target_fps: u32,
    /// Logical screen size the viewport is fitted to
    pub screen_width: f32,
    pub screen_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,

            target_fps: 60,
            screen_width: 1280.0,
            screen_height: 720.0,
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::info!("No settings at {} ({err}), using defaults", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring malformed settings {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Serialize for saving
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Frame duration in seconds at the target frame rate
    pub fn frame_time(&self) -> f32 {
        1.0 / self.target_fps as f32
    }

    fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.target_fps = self.target_fps.clamp(10, 240);
        self.screen_width = self.screen_width.max(1.0);
        self.screen_height = self.screen_height.max(1.0);
        self
    }
}
