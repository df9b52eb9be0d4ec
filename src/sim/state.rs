//! Game session and entity state
//!
//! Everything the tick mutates lives in one [`GameSession`] aggregate; the
//! bridges read it between ticks.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::level::{CellKind, Level, LevelError, LevelPack};
use crate::tuning::Tuning;

/// RNG stream for level generation (`'?'` cells)
const LEVEL_STREAM: u64 = 1;
/// RNG stream for ball launch direction
const LAUNCH_STREAM: u64 = 2;

/// Top-level game flow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start or level select
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Ball left the level
    GameOver,
    /// Every level cleared
    Victory,
}

/// Discrete audio cue for the audio bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// Level cleared
    Win,
    /// Ball lost
    Lose,
    /// Powerup collected
    Pickup,
    /// Ball bounced off an unbreakable block
    UnbreakableHit,
    /// Multi-hit block lost a hitpoint
    DamageHit,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Ball {
    pub fn new(size: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size,
        }
    }

    /// Hitbox at the current position
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Move to the level's spawn marker (consuming it) and launch upward with
    /// a random horizontal sign. Returns false if the level has no marker.
    pub fn spawn<R: Rng>(&mut self, level: &mut Level, tuning: &Tuning, rng: &mut R) -> bool {
        let Some((row, column)) = level.take_marker(CellKind::BallSpawn) else {
            log::warn!("Level has no ball spawn marker; ball left at {:?}", self.pos);
            return false;
        };

        let (vx, vy) = tuning.launch_components();
        let vx = if rng.random_bool(0.5) { vx } else { -vx };
        self.pos = Vec2::new(column as f32, row as f32);
        self.vel = Vec2::new(vx, -vy);
        true
    }

    /// Whether the ball's cell (floored position) is still on the grid
    pub fn is_inside(&self, level: &Level) -> bool {
        level.in_bounds(self.pos.y.floor() as i32, self.pos.x.floor() as i32)
    }
}

/// The player's paddle (moves horizontally only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub size: Vec2,
    /// Distance moved per tick while a direction is held
    pub speed: f32,
}

impl Paddle {
    pub fn new(size: Vec2, speed: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            size,
            speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// Place at the `=` marker, or centered two rows above the bottom
    pub fn spawn(&mut self, level: &mut Level) {
        self.pos = match level.take_marker(CellKind::PaddleSpawn) {
            Some((row, column)) => Vec2::new(column as f32, row as f32),
            None => Vec2::new(
                (level.columns() as f32 - self.size.x) / 2.0,
                level.rows().saturating_sub(2) as f32,
            ),
        };
        self.clamp_to(level.columns());
    }

    /// Shift horizontally, keeping the paddle fully inside `[0, columns)`
    pub fn move_by(&mut self, delta: f32, columns: usize) {
        self.pos.x += delta;
        self.clamp_to(columns);
    }

    fn clamp_to(&mut self, columns: usize) {
        let max_x = (columns as f32 - self.size.x).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }
}

/// A falling collectible dropped by a destroyed powerup block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub pos: Vec2,
    pub active: bool,
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Current phase
    pub phase: GamePhase,
    /// Grid of the level being played
    pub level: Level,
    /// Index into the level pack (0-based)
    pub level_index: usize,
    /// Destructible cells left; reaching zero clears the level
    pub blocks_remaining: u32,
    pub ball: Ball,
    pub paddle: Paddle,
    /// Live powerups
    pub powerups: Vec<Powerup>,
    /// Powerups caught since the session started
    pub powerups_collected: u32,
    /// Tick counter, never reset (paces sprite animation)
    pub frame: u64,
    pub tuning: Tuning,
    pack: LevelPack,
    cues: Vec<Cue>,
    level_rng: Pcg32,
    launch_rng: Pcg32,
}

impl GameSession {
    /// Create a session in the menu with the first level loaded
    pub fn new(pack: LevelPack, tuning: Tuning, seed: u64) -> Self {
        let tuning = tuning.validate();
        let mut session = Self {
            phase: GamePhase::Menu,
            level: Level::filled(0, 0, CellKind::Empty),
            level_index: 0,
            blocks_remaining: 0,
            ball: Ball::new(tuning.ball_size),
            paddle: Paddle::new(tuning.paddle_size, tuning.paddle_speed),
            powerups: Vec::new(),
            powerups_collected: 0,
            frame: 0,
            pack,
            cues: Vec::new(),
            level_rng: Pcg32::new(seed, LEVEL_STREAM),
            launch_rng: Pcg32::new(seed, LAUNCH_STREAM),
            tuning,
        };
        session.load_level(0);
        session
    }

    /// Session over the built-in levels with default tuning
    pub fn with_seed(seed: u64) -> Result<Self, LevelError> {
        Ok(Self::new(LevelPack::builtin()?, Tuning::default(), seed))
    }

    /// Session seeded from OS entropy
    pub fn from_entropy() -> Result<Self, LevelError> {
        let seed: u64 = rand::random();
        log::debug!("Session seed {seed}");
        Self::with_seed(seed)
    }

    pub fn level_count(&self) -> usize {
        self.pack.len()
    }

    pub fn level_name(&self) -> Option<&str> {
        self.pack.get(self.level_index).map(|t| t.name.as_str())
    }

    /// Advance `offset` levels and load a fresh grid.
    ///
    /// Running past the last level switches to [`GamePhase::Victory`] and
    /// rewinds the index to 0 instead of loading anything.
    pub fn load_level(&mut self, offset: usize) {
        self.level_index += offset;

        let Some(template) = self.pack.get(self.level_index) else {
            log::info!("All {} levels cleared", self.pack.len());
            self.phase = GamePhase::Victory;
            self.level_index = 0;
            return;
        };

        self.level = Level::load(template, &mut self.level_rng);
        self.blocks_remaining = self.level.destructible_count();
        self.powerups.clear();
        self.ball.spawn(&mut self.level, &self.tuning, &mut self.launch_rng);
        self.paddle.spawn(&mut self.level);

        log::info!(
            "Level {} '{}' loaded: {}x{}, {} blocks",
            self.level_index + 1,
            template.name,
            self.level.rows(),
            self.level.columns(),
            self.blocks_remaining
        );
    }

    /// Point the session at another level (applied on the next load).
    /// Returns false if the index is past the last level.
    pub fn select_level(&mut self, index: usize) -> bool {
        if index >= self.pack.len() {
            return false;
        }
        self.level_index = index;
        true
    }

    pub(crate) fn emit(&mut self, cue: Cue) {
        log::debug!("Cue {cue:?}");
        self.cues.push(cue);
    }

    /// Cues emitted since the last drain
    pub fn pending_cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Take all queued cues (call once per frame)
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::LevelTemplate;
    use proptest::prelude::*;

    fn pack(rows: &[&str]) -> LevelPack {
        LevelPack::new(vec![LevelTemplate::parse("test", rows).unwrap()]).unwrap()
    }

    #[test]
    fn test_new_session_starts_in_menu_with_level_loaded() {
        let session = GameSession::with_seed(7).unwrap();
        assert_eq!(session.phase, GamePhase::Menu);
        assert_eq!(session.level_index, 0);
        assert_eq!(session.level_count(), 5);
        assert_eq!(session.blocks_remaining, session.level.destructible_count());
        assert!(session.blocks_remaining > 0);
        assert_eq!(session.level.find(CellKind::BallSpawn), None);
        assert_eq!(session.level.find(CellKind::PaddleSpawn), None);
    }

    #[test]
    fn test_ball_spawn_consumes_marker_and_launches_up() {
        let session = GameSession::new(pack(&["#####", "# * #", "#   #"]), Tuning::default(), 3);
        assert_eq!(session.ball.pos, Vec2::new(2.0, 1.0));
        assert_eq!(session.level.cell(1, 2), CellKind::Empty);
        assert!(session.ball.vel.y < 0.0);
        let (vx, vy) = Tuning::default().launch_components();
        assert!((session.ball.vel.x.abs() - vx).abs() < 1e-6);
        assert!((session.ball.vel.y + vy).abs() < 1e-6);
    }

    #[test]
    fn test_launch_direction_varies_with_seed() {
        let signs: Vec<bool> = (0..32)
            .map(|seed| GameSession::with_seed(seed).unwrap().ball.vel.x > 0.0)
            .collect();
        assert!(signs.iter().any(|&s| s));
        assert!(signs.iter().any(|&s| !s));
    }

    #[test]
    fn test_paddle_spawn_without_marker_is_centered_near_bottom() {
        let session = GameSession::new(
            pack(&["          ", "    *     ", "          ", "          "]),
            Tuning::default(),
            1,
        );
        assert_eq!(session.paddle.pos, Vec2::new(3.5, 2.0));
    }

    #[test]
    fn test_paddle_spawn_marker() {
        let session = GameSession::new(
            pack(&["#  *    #", "#      =#", "#       #"]),
            Tuning::default(),
            1,
        );
        // Marker at column 7 is clamped so the 3-wide paddle fits
        assert_eq!(session.paddle.pos, Vec2::new(6.0, 1.0));
        assert_eq!(session.level.cell(1, 7), CellKind::Empty);
    }

    #[test]
    fn test_load_past_last_level_is_victory() {
        let mut session = GameSession::with_seed(1).unwrap();
        session.phase = GamePhase::Playing;
        session.level_index = session.level_count() - 1;
        session.load_level(1);
        assert_eq!(session.phase, GamePhase::Victory);
        assert_eq!(session.level_index, 0);
    }

    #[test]
    fn test_select_level_bounds() {
        let mut session = GameSession::with_seed(1).unwrap();
        assert!(session.select_level(4));
        assert_eq!(session.level_index, 4);
        assert!(!session.select_level(5));
        assert_eq!(session.level_index, 4);
    }

    #[test]
    fn test_drain_cues_empties_queue() {
        let mut session = GameSession::with_seed(1).unwrap();
        session.emit(Cue::Win);
        session.emit(Cue::Pickup);
        assert_eq!(session.pending_cues(), &[Cue::Win, Cue::Pickup]);
        assert_eq!(session.drain_cues(), vec![Cue::Win, Cue::Pickup]);
        assert!(session.pending_cues().is_empty());
    }

    #[test]
    fn test_is_inside_uses_floored_cell() {
        let level = Level::filled(4, 4, CellKind::Empty);
        let mut ball = Ball::new(Vec2::splat(0.3));
        ball.pos = Vec2::new(3.9, 3.9);
        assert!(ball.is_inside(&level));
        ball.pos = Vec2::new(-0.1, 2.0);
        assert!(!ball.is_inside(&level));
        ball.pos = Vec2::new(2.0, -0.1);
        assert!(!ball.is_inside(&level));
        ball.pos = Vec2::new(2.0, 4.0);
        assert!(!ball.is_inside(&level));
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_inside(
            start in 0.0f32..13.0,
            moves in prop::collection::vec(-5.0f32..5.0, 0..64),
        ) {
            let columns = 16;
            let mut paddle = Paddle::new(Vec2::new(3.0, 1.0), 0.2);
            paddle.pos.x = start;
            for delta in moves {
                paddle.move_by(delta, columns);
                prop_assert!(paddle.pos.x >= 0.0);
                prop_assert!(paddle.pos.x <= columns as f32 - paddle.size.x);
            }
        }
    }
}
