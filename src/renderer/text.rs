//! Plain-text frontend: renders a frame as ASCII art
//!
//! Used by the headless demo and handy in tests; one character per cell.

use glam::Vec2;

use super::{RenderBridge, SpriteAnimation};
use crate::sim::{CellKind, Level};

const BALL_FRAMES: [char; 4] = ['o', 'O', '0', 'O'];
const PADDLE_GLYPH: char = '=';
const POWERUP_GLYPH: char = 's';

/// Character-grid renderer
#[derive(Debug, Clone)]
pub struct TextRenderer {
    grid: Vec<Vec<char>>,
    lines: Vec<String>,
    ball_sprite: SpriteAnimation,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            grid: Vec::new(),
            lines: Vec::new(),
            ball_sprite: SpriteAnimation::new(BALL_FRAMES.len(), 9, true),
        }
    }

    /// Take the finished frame, leaving the renderer empty for the next one
    pub fn finish(&mut self) -> String {
        let mut out: Vec<String> = self
            .grid
            .drain(..)
            .map(|row| row.into_iter().collect::<String>())
            .collect();
        out.append(&mut self.lines);
        out.join("\n")
    }

    fn put(&mut self, row: f32, column: f32, glyph: char) {
        if row < 0.0 || column < 0.0 {
            return;
        }
        if let Some(cell) = self
            .grid
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(column as usize))
        {
            *cell = glyph;
        }
    }

    fn cell_glyph(kind: CellKind) -> char {
        match kind {
            CellKind::BallSpawn | CellKind::PaddleSpawn => ' ',
            other => other.glyph(),
        }
    }
}

impl RenderBridge for TextRenderer {
    fn draw_level(&mut self, level: &Level) {
        self.grid = (0..level.rows())
            .map(|row| level.row(row).iter().map(|&c| Self::cell_glyph(c)).collect())
            .collect();
    }

    fn draw_paddle(&mut self, pos: Vec2, size: Vec2) {
        let row = pos.y.floor();
        let start = pos.x.round() as i32;
        for column in start..start + size.x.round() as i32 {
            self.put(row, column as f32, PADDLE_GLYPH);
        }
    }

    fn draw_ball(&mut self, pos: Vec2, size: Vec2, frame: u64) {
        let glyph = BALL_FRAMES[self.ball_sprite.advance(frame)];
        let center = pos + size * 0.5;
        self.put(center.y.floor(), center.x.floor(), glyph);
    }

    fn draw_powerup(&mut self, pos: Vec2) {
        self.put(pos.y.floor(), pos.x.floor(), POWERUP_GLYPH);
    }

    fn draw_ui(&mut self, level_index: usize, level_count: usize, blocks_remaining: u32) {
        self.lines.push(format!(
            "LEVEL {} OUT OF {}   BLOCKS {}",
            level_index + 1,
            level_count,
            blocks_remaining
        ));
    }

    fn draw_menu(&mut self) {
        self.lines.push("BREAKOUT".to_string());
        self.lines.push("Press Enter to Start".to_string());
    }

    fn draw_pause_menu(&mut self) {
        self.lines.push("PAUSE".to_string());
        self.lines.push("Press P to Resume".to_string());
    }

    fn draw_game_over_menu(&mut self) {
        self.lines.push("GAME OVER".to_string());
        self.lines.push("Press ENTER to Try Again".to_string());
        self.lines.push("Press M for Menu".to_string());
    }

    fn draw_victory_menu(&mut self) {
        self.lines.push("Victory!".to_string());
        self.lines.push("Press Enter to Restart".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::draw_frame;
    use crate::sim::{GamePhase, GameSession};

    #[test]
    fn test_playing_frame() {
        let mut session = GameSession::with_seed(1).unwrap();
        session.phase = GamePhase::Playing;
        let mut renderer = TextRenderer::new();
        draw_frame(&session, &mut renderer);
        let frame = renderer.finish();
        let lines: Vec<&str> = frame.lines().collect();

        assert_eq!(lines.len(), 14);
        assert_eq!(lines[0], "################");
        assert_eq!(lines[2], "# @@@@@@@@@@@@ #");
        // Ball spawned at (8, 8), paddle marker at (6, 11)
        assert_eq!(lines[8], "#       o      #");
        assert_eq!(lines[11], "#     ===      #");
        assert_eq!(lines[13], "LEVEL 1 OUT OF 5   BLOCKS 36");
    }

    #[test]
    fn test_ball_glyph_follows_animation() {
        let mut renderer = TextRenderer::new();
        let mut glyphs = Vec::new();
        // Construction counts as the first shown frame
        for frame in 1..=10 {
            renderer.draw_level(&Level::filled(1, 1, CellKind::Empty));
            renderer.draw_ball(Vec2::ZERO, Vec2::splat(0.3), frame);
            glyphs.push(renderer.finish());
        }
        assert_eq!(glyphs[0], "o");
        assert_eq!(glyphs[8], "o");
        assert_eq!(glyphs[9], "O");
    }

    #[test]
    fn test_menu_frame_has_no_grid() {
        let session = GameSession::with_seed(1).unwrap();
        let mut renderer = TextRenderer::new();
        draw_frame(&session, &mut renderer);
        assert_eq!(renderer.finish(), "BREAKOUT\nPress Enter to Start");
        // Renderer is empty again
        assert_eq!(renderer.finish(), "");
    }

    #[test]
    fn test_multi_hit_blocks_show_hitpoints() {
        let mut level = Level::filled(1, 3, CellKind::Empty);
        level.set_cell(0, 0, CellKind::MultiHit { hp: 10 });
        level.set_cell(0, 1, CellKind::MultiHit { hp: 4 });
        level.set_cell(0, 2, CellKind::BallSpawn);
        let mut renderer = TextRenderer::new();
        renderer.draw_level(&level);
        assert_eq!(renderer.finish(), "A4 ");
    }

    #[test]
    fn test_off_grid_draws_are_dropped() {
        let mut renderer = TextRenderer::new();
        renderer.draw_level(&Level::filled(2, 2, CellKind::Empty));
        renderer.draw_ball(Vec2::new(-3.0, 0.0), Vec2::splat(0.3), 1);
        renderer.draw_powerup(Vec2::new(0.0, 5.0));
        assert_eq!(renderer.finish(), "  \n  ");
    }
}
