//! Data-driven game balance
//!
//! All positions and speeds are in grid-cell units per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Largest ball edge that still cannot skip over a whole cell
const MAX_BALL_EDGE: f32 = 0.95;

/// Gameplay balance constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Ball hitbox size (must stay below one cell)
    pub ball_size: Vec2,
    /// Ball speed at launch (cells per tick)
    pub launch_speed: f32,
    /// Launch angle from horizontal (degrees)
    pub launch_angle_degrees: f32,
    /// Paddle hitbox size
    pub paddle_size: Vec2,
    /// Paddle horizontal speed while a direction is held
    pub paddle_speed: f32,
    /// Powerup fall speed
    pub powerup_fall_speed: f32,
    /// Powerup hitbox size
    pub powerup_size: Vec2,
    /// Horizontal nudge per cell of offset from paddle center
    pub english_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_size: Vec2::new(0.3, 0.3),
            launch_speed: 0.15,
            launch_angle_degrees: 60.0,
            paddle_size: Vec2::new(3.0, 1.0),
            paddle_speed: 0.2,
            powerup_fall_speed: 0.05,
            powerup_size: Vec2::new(1.0, 1.0),
            english_factor: 0.05,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::validate)
    }

    /// Clamp values into ranges the collision scan can handle
    pub fn validate(mut self) -> Self {
        let clamped = self.ball_size.clamp(Vec2::splat(0.05), Vec2::splat(MAX_BALL_EDGE));
        if clamped != self.ball_size {
            log::warn!(
                "Ball size {:?} out of range, clamped to {:?}",
                self.ball_size,
                clamped
            );
            self.ball_size = clamped;
        }
        self.launch_speed = self.launch_speed.abs();
        self.paddle_speed = self.paddle_speed.abs();
        self
    }

    /// Launch velocity magnitude split into (horizontal, vertical) components
    pub fn launch_components(&self) -> (f32, f32) {
        let radians = self.launch_angle_degrees.to_radians();
        (
            self.launch_speed * radians.cos(),
            self.launch_speed * radians.sin(),
        )
    }
}
