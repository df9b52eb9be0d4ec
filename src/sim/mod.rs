//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, no wall-clock time
//! - Seeded RNG only
//! - Row-major scan order for every grid search
//! - No rendering or audio dependencies; effects leave as [`Cue`]s

pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{BlockContact, Bounce, Rect, find_block_contact, paddle_deflection};
pub use level::{CellKind, Level, LevelError, LevelPack, LevelTemplate};
pub use state::{Ball, Cue, GamePhase, GameSession, Paddle, Powerup};
pub use tick::{TickInput, move_ball, tick, update_powerups};
