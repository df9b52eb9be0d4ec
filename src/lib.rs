//! Grid Breakout - a paddle deflects a ball through hand-authored block levels
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level grid, physics, game state machine)
//! - `renderer`: Draw-call bridge, viewport metrics and a text renderer
//! - `audio`: Cue to sound-effect bridge
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fewest hitpoints a randomized multi-hit block can roll
    pub const RANDOM_MULTI_HIT_MIN: u8 = 2;
    /// Most hitpoints any multi-hit block can have ('B')
    pub const MULTI_HIT_MAX: u8 = 11;
}
