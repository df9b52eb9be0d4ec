//! Collision detection and response on the level grid
//!
//! Everything here is axis-aligned: the ball, paddle and powerups are boxes and
//! every grid cell is a unit box. Detection is a per-tick overlap test at the
//! tentative next position, not a swept test, so the ball must stay smaller
//! than one cell.

use std::ops::RangeInclusive;

use glam::Vec2;

use super::level::{CellKind, Level};

/// Axis-aligned box in grid units, anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// The unit box of grid cell (row, column)
    pub fn cell(row: usize, column: usize) -> Self {
        Self::new(Vec2::new(column as f32, row as f32), Vec2::ONE)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Open-interval overlap on the x axis (touching edges do not count)
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.min.x < other.max().x && self.max().x > other.min.x
    }

    /// Open-interval overlap on the y axis
    #[inline]
    pub fn overlaps_y(&self, other: &Rect) -> bool {
        self.min.y < other.max().y && self.max().y > other.min.y
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }

    /// Integer rows and columns touched by this box (may be out of bounds)
    pub fn cell_span(&self) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        let max = self.max();
        (
            self.min.y.floor() as i32..=max.y.floor() as i32,
            self.min.x.floor() as i32..=max.x.floor() as i32,
        )
    }
}

/// Which velocity components a block contact inverts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounce {
    /// Approached through a horizontal face: invert y
    Vertical,
    /// Approached through a vertical face: invert x
    Horizontal,
    /// Corner hit (or already embedded): invert both
    Both,
}

impl Bounce {
    /// Pick the bounce from how the ball box overlapped the cell before moving.
    ///
    /// Already aligned on x means the ball came in vertically, and vice versa.
    pub fn from_prior_overlap(prev: &Rect, cell: &Rect) -> Self {
        match (prev.overlaps_x(cell), prev.overlaps_y(cell)) {
            (true, false) => Bounce::Vertical,
            (false, true) => Bounce::Horizontal,
            _ => Bounce::Both,
        }
    }

    pub fn apply(self, vel: Vec2) -> Vec2 {
        match self {
            Bounce::Vertical => Vec2::new(vel.x, -vel.y),
            Bounce::Horizontal => Vec2::new(-vel.x, vel.y),
            Bounce::Both => -vel,
        }
    }
}

/// Whether the ball bounces off this cell
pub fn is_collidable(cell: CellKind) -> bool {
    matches!(
        cell,
        CellKind::Wall
            | CellKind::Breakable
            | CellKind::Unbreakable
            | CellKind::Powerup
            | CellKind::MultiHit { .. }
    )
}

/// The single block contact resolved this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockContact {
    pub row: usize,
    pub column: usize,
    pub cell: CellKind,
    pub bounce: Bounce,
}

/// First collidable cell overlapping `next`, scanning row-major.
///
/// Only one contact is reported per tick; simultaneous hits on neighbouring
/// blocks resolve against whichever comes first in the scan.
pub fn find_block_contact(level: &Level, prev: &Rect, next: &Rect) -> Option<BlockContact> {
    let (rows, columns) = next.cell_span();
    for row in rows {
        for column in columns.clone() {
            if !level.in_bounds(row, column) {
                continue;
            }
            let (row, column) = (row as usize, column as usize);
            let cell = level.cell(row, column);
            if !is_collidable(cell) {
                continue;
            }

            let cell_rect = Rect::cell(row, column);
            if next.overlaps(&cell_rect) {
                return Some(BlockContact {
                    row,
                    column,
                    cell,
                    bounce: Bounce::from_prior_overlap(prev, &cell_rect),
                });
            }
        }
    }
    None
}

/// Ball velocity after touching the paddle.
///
/// Vertical speed always points up afterwards; the horizontal component gets
/// "english" proportional to how far off-center the ball struck.
pub fn paddle_deflection(vel: Vec2, ball: &Rect, paddle: &Rect, english_factor: f32) -> Vec2 {
    let offset = ball.center().x - paddle.center().x;
    Vec2::new(vel.x + offset * english_factor, -vel.y.abs())
}
