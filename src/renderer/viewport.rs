//! Grid-to-screen mapping
//!
//! The level is scaled uniformly to fit the screen, centered horizontally and
//! anchored to the bottom edge.

use glam::Vec2;

/// Reference screen size for text scaling
const TEXT_SCALE_DIVISOR: f32 = 700.0;

/// Pixel metrics for drawing one level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Side of one grid cell in pixels
    pub cell_size: f32,
    /// Pixel position of grid origin
    pub offset: Vec2,
    /// Multiplier for font sizes
    pub text_scale: f32,
}

impl Viewport {
    /// Fit a `rows` x `columns` grid into `screen` pixels
    pub fn fit(screen: Vec2, rows: usize, columns: usize) -> Self {
        let rows = rows.max(1) as f32;
        let columns = columns.max(1) as f32;
        let cell_size = (screen.x / columns).min(screen.y / rows);
        let level_size = Vec2::new(columns, rows) * cell_size;

        Self {
            cell_size,
            offset: Vec2::new((screen.x - level_size.x) * 0.5, screen.y - level_size.y),
            text_scale: screen.min_element() / TEXT_SCALE_DIVISOR,
        }
    }

    #[inline]
    pub fn to_screen(&self, grid_pos: Vec2) -> Vec2 {
        self.offset + grid_pos * self.cell_size
    }

    #[inline]
    pub fn scale(&self, grid_size: Vec2) -> Vec2 {
        grid_size * self.cell_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_screen_centers_horizontally() {
        let vp = Viewport::fit(Vec2::new(1600.0, 800.0), 10, 10);
        assert_eq!(vp.cell_size, 80.0);
        assert_eq!(vp.offset, Vec2::new(400.0, 0.0));
        assert_eq!(vp.to_screen(Vec2::new(1.0, 2.0)), Vec2::new(480.0, 160.0));
        assert_eq!(vp.scale(Vec2::new(3.0, 1.0)), Vec2::new(240.0, 80.0));
    }

    #[test]
    fn test_tall_screen_anchors_bottom() {
        let vp = Viewport::fit(Vec2::new(400.0, 1000.0), 4, 8);
        assert_eq!(vp.cell_size, 50.0);
        assert_eq!(vp.offset, Vec2::new(0.0, 800.0));
        assert_eq!(vp.text_scale, 400.0 / 700.0);
    }
}
