//! Axis-aligned bounding box tests and screen-bounds utilities.

use crate::constants::world;

#[derive(Debug, Default, Clone, Copy)]
pub struct CollisionRule;

impl CollisionRule {
    /// Strict AABB overlap test: touching edges do not count as a collision.
    pub fn aabb(x1: f32, y1: f32, w1: f32, h1: f32, x2: f32, y2: f32, w2: f32, h2: f32) -> bool {
        x1 < x2 + w2 && x2 < x1 + w1 && y1 < y2 + h2 && y2 < y1 + h1
    }

    /// True iff the hitbox is entirely outside the screen on some axis.
    pub fn is_out_of_bounds(x: f32, y: f32, w: f32, h: f32) -> bool {
        x + w < 0.0 || x > world::SCREEN_WIDTH || y + h < 0.0 || y > world::SCREEN_HEIGHT
    }

    /// True iff any edge of the hitbox crosses a screen boundary.
    pub fn is_partially_out_of_bounds(x: f32, y: f32, w: f32, h: f32) -> bool {
        x < 0.0 || x + w > world::SCREEN_WIDTH || y < 0.0 || y + h > world::SCREEN_HEIGHT
    }

    /// Inclusive point-in-rect test.
    pub fn contains_point(x: f32, y: f32, w: f32, h: f32, px: f32, py: f32) -> bool {
        px >= x && px <= x + w && py >= y && py <= y + h
    }

    /// Clamps `(x, y)` in place so `[x, x+w] ⊆ [0, SCREEN_W]` and
    /// `[y, y+h] ⊆ [0, SCREEN_H]`.
    pub fn clamp_to_screen(x: &mut f32, y: &mut f32, w: f32, h: f32) {
        let max_x = (world::SCREEN_WIDTH - w).max(0.0);
        let max_y = (world::SCREEN_HEIGHT - h).max(0.0);
        *x = x.clamp(0.0, max_x);
        *y = y.clamp(0.0, max_y);
    }

    pub fn screen_width() -> f32 {
        world::SCREEN_WIDTH
    }

    pub fn screen_height() -> f32 {
        world::SCREEN_HEIGHT
    }
}
