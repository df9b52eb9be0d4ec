//! Rendering bridge
//!
//! The simulation never draws. Each frame the caller hands the session to
//! [`draw_frame`], which issues draw calls on a [`RenderBridge`] according to
//! the current phase. Everything passed to the bridge is in grid units; use a
//! [`Viewport`] to map to pixels.

pub mod sprite;
pub mod text;
pub mod viewport;

pub use sprite::SpriteAnimation;
pub use text::TextRenderer;
pub use viewport::Viewport;

use glam::Vec2;

use crate::sim::{GamePhase, GameSession, Level};

/// Draw calls a frontend implements
pub trait RenderBridge {
    fn draw_level(&mut self, level: &Level);
    fn draw_paddle(&mut self, pos: Vec2, size: Vec2);
    /// `frame` is the session tick counter, for animation pacing
    fn draw_ball(&mut self, pos: Vec2, size: Vec2, frame: u64);
    fn draw_powerup(&mut self, pos: Vec2);
    fn draw_ui(&mut self, level_index: usize, level_count: usize, blocks_remaining: u32);
    fn draw_menu(&mut self);
    fn draw_pause_menu(&mut self);
    fn draw_game_over_menu(&mut self);
    fn draw_victory_menu(&mut self);
}

/// Issue the draw calls for one frame
pub fn draw_frame<B: RenderBridge>(session: &GameSession, bridge: &mut B) {
    match session.phase {
        GamePhase::Menu => bridge.draw_menu(),
        GamePhase::Victory => bridge.draw_victory_menu(),
        GamePhase::Playing | GamePhase::Paused | GamePhase::GameOver => {
            bridge.draw_level(&session.level);
            bridge.draw_paddle(session.paddle.pos, session.paddle.size);
            bridge.draw_ball(session.ball.pos, session.ball.size, session.frame);
            bridge.draw_ui(
                session.level_index,
                session.level_count(),
                session.blocks_remaining,
            );
            for powerup in session.powerups.iter().filter(|p| p.active) {
                bridge.draw_powerup(powerup.pos);
            }

            match session.phase {
                GamePhase::Paused => bridge.draw_pause_menu(),
                GamePhase::GameOver => bridge.draw_game_over_menu(),
                _ => {}
            }
        }
    }
}
