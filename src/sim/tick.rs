//! Fixed timestep simulation tick
//!
//! One call per rendered frame: polls the input for state transitions and,
//! while playing, advances paddle, ball and powerups by one step.

use glam::Vec2;

use super::collision::{Rect, find_block_contact, paddle_deflection};
use super::level::CellKind;
use super::state::{Cue, GamePhase, GameSession, Powerup};

/// Input commands for a single tick
///
/// Movement flags are level-triggered (held keys); every other field is an
/// edge-triggered action the caller clears after the tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move paddle left (held)
    pub left: bool,
    /// Move paddle right (held)
    pub right: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start from the menu / dismiss the victory screen / retry after game over
    pub confirm: bool,
    /// Jump straight to a level from the menu (0-based; key "1" is level 0)
    pub select_level: Option<usize>,
    /// Retry the current level after game over
    pub restart: bool,
    /// Leave the game over screen for the menu
    pub menu: bool,
    /// Attract mode - the paddle follows the ball
    pub autopilot: bool,
}

/// Advance the session by one tick
pub fn tick(state: &mut GameSession, input: &TickInput) {
    state.frame += 1;

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Paused => {}
        GamePhase::Menu => tick_menu(state, input),
        GamePhase::GameOver => tick_game_over(state, input),
        GamePhase::Victory => {
            if input.confirm {
                state.phase = GamePhase::Menu;
            }
        }
        GamePhase::Playing => tick_playing(state, input),
    }
}

fn tick_menu(state: &mut GameSession, input: &TickInput) {
    if let Some(index) = input.select_level {
        if !state.select_level(index) {
            log::warn!(
                "Level {} does not exist ({} levels)",
                index + 1,
                state.level_count()
            );
            return;
        }
    } else if !input.confirm {
        return;
    }

    log::info!("Starting at level {}", state.level_index + 1);
    state.phase = GamePhase::Playing;
    state.powerups_collected = 0;
    state.load_level(0);
}

fn tick_game_over(state: &mut GameSession, input: &TickInput) {
    if input.restart || input.confirm {
        log::info!("Retrying level {}", state.level_index + 1);
        state.phase = GamePhase::Playing;
        state.load_level(0);
    } else if input.menu {
        state.level_index = 0;
        state.phase = GamePhase::Menu;
    }
}

fn tick_playing(state: &mut GameSession, input: &TickInput) {
    let direction = if input.autopilot {
        autopilot_direction(state)
    } else {
        (input.right as i8 - input.left as i8) as f32
    };
    if direction != 0.0 {
        let columns = state.level.columns();
        let delta = direction * state.paddle.speed;
        state.paddle.move_by(delta, columns);
    }

    move_ball(state);
    update_powerups(state);

    if !state.ball.is_inside(&state.level) {
        log::info!("Ball lost at {:?}", state.ball.pos);
        state.emit(Cue::Lose);
        state.phase = GamePhase::GameOver;
    } else if state.blocks_remaining == 0 {
        log::info!("Level {} cleared", state.level_index + 1);
        state.emit(Cue::Win);
        state.load_level(1);
    }
}

/// Steer toward the ball's center, with a dead zone to avoid jitter
fn autopilot_direction(state: &GameSession) -> f32 {
    let target = state.ball.rect().center().x;
    let offset = target - state.paddle.center_x();
    if offset.abs() <= state.paddle.speed {
        0.0
    } else {
        offset.signum()
    }
}

/// Move the ball one step, resolving at most one block contact.
///
/// Grid cells take priority; the paddle is only tested when no block was hit.
pub fn move_ball(state: &mut GameSession) {
    let prev = state.ball.rect();
    let next = Rect::new(state.ball.pos + state.ball.vel, state.ball.size);

    if let Some(contact) = find_block_contact(&state.level, &prev, &next) {
        log::trace!(
            "Ball hit {:?} at ({}, {}), bounce {:?}",
            contact.cell,
            contact.row,
            contact.column,
            contact.bounce
        );
        state.ball.vel = contact.bounce.apply(state.ball.vel);
        hit_block(state, contact.row, contact.column);
    } else if next.overlaps(&state.paddle.rect()) {
        state.ball.vel = paddle_deflection(
            state.ball.vel,
            &next,
            &state.paddle.rect(),
            state.tuning.english_factor,
        );
    }

    state.ball.pos += state.ball.vel;
}

/// Apply the side effect of the ball striking cell (row, column)
pub fn hit_block(state: &mut GameSession, row: usize, column: usize) {
    match state.level.cell(row, column) {
        CellKind::Breakable => destroy_block(state, row, column),
        CellKind::Powerup => {
            destroy_block(state, row, column);
            state.powerups.push(Powerup {
                pos: Vec2::new(column as f32, row as f32),
                active: true,
            });
        }
        CellKind::MultiHit { hp } => {
            state.emit(Cue::DamageHit);
            if hp > 1 {
                state
                    .level
                    .set_cell(row, column, CellKind::MultiHit { hp: hp - 1 });
            } else {
                destroy_block(state, row, column);
            }
        }
        CellKind::Unbreakable => state.emit(Cue::UnbreakableHit),
        _ => {}
    }
}

fn destroy_block(state: &mut GameSession, row: usize, column: usize) {
    state.level.set_cell(row, column, CellKind::Empty);
    state.blocks_remaining = state.blocks_remaining.saturating_sub(1);
}

/// Drop powerups by one step; catch the ones touching the paddle and discard
/// the ones that fell past the bottom row.
pub fn update_powerups(state: &mut GameSession) {
    let paddle = state.paddle.rect();
    let size = state.tuning.powerup_size;
    let fall = state.tuning.powerup_fall_speed;
    let floor = state.level.rows() as f32;

    let mut caught = 0;
    for powerup in state.powerups.iter_mut().filter(|p| p.active) {
        powerup.pos.y += fall;

        if Rect::new(powerup.pos, size).overlaps(&paddle) {
            // Collecting has no gameplay modifier yet; only counted and cued
            powerup.active = false;
            caught += 1;
        } else if powerup.pos.y > floor {
            powerup.active = false;
        }
    }
    state.powerups.retain(|p| p.active);

    for _ in 0..caught {
        state.powerups_collected += 1;
        state.emit(Cue::Pickup);
    }
}
