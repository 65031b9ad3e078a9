//! Distance and toroidal-wrap helpers shared by every moving entity.

use serde::{Deserialize, Serialize};

/// How far past an edge an entity may drift before it re-enters on the
/// opposite side. Keeps large asteroids from popping at the border.
pub const WRAP_MARGIN: f32 = 50.0;

#[inline]
pub fn dist(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    (bx - ax).hypot(by - ay)
}

/// Strict circle–circle overlap: touching circles do not collide.
#[inline]
pub fn circles_overlap(ax: f32, ay: f32, ar: f32, bx: f32, by: f32, br: f32) -> bool {
    dist(ax, ay, bx, by) < ar + br
}

/// The visible play-field. Positions are in pixels with the origin top-left.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayField {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 720.0,
        }
    }
}

impl PlayField {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn wrap(&self, x: &mut f32, y: &mut f32) {
        *x = wrap_axis(*x, self.width);
        *y = wrap_axis(*y, self.height);
    }

    pub fn wrap_vertical(&self, y: &mut f32) {
        *y = wrap_axis(*y, self.height);
    }
}

#[inline]
fn wrap_axis(value: f32, extent: f32) -> f32 {
    if value < -WRAP_MARGIN {
        value + extent + 2.0 * WRAP_MARGIN
    } else if value > extent + WRAP_MARGIN {
        value - (extent + 2.0 * WRAP_MARGIN)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_left_edge_reenters_right() {
        let field = PlayField::new(800.0, 600.0);
        let (mut x, mut y) = (-51.0, 300.0);
        field.wrap(&mut x, &mut y);
        assert_eq!(x, -51.0 + 800.0 + 100.0);
        assert_eq!(y, 300.0);
    }

    #[test]
    fn wrap_right_edge_reenters_left() {
        let field = PlayField::new(800.0, 600.0);
        let (mut x, mut y) = (851.0, 10.0);
        field.wrap(&mut x, &mut y);
        assert_eq!(x, 851.0 - 900.0);
    }

    #[test]
    fn margin_boundary_is_open() {
        let field = PlayField::new(800.0, 600.0);
        let (mut x, mut y) = (-50.0, 650.0);
        field.wrap(&mut x, &mut y);
        assert_eq!(x, -50.0);
        assert_eq!(y, 650.0);
    }

    #[test]
    fn vertical_wrap_leaves_x_alone() {
        let field = PlayField::new(800.0, 600.0);
        let mut y = -60.0;
        field.wrap_vertical(&mut y);
        assert_eq!(y, -60.0 + 700.0);
    }

    #[test]
    fn touching_circles_do_not_overlap() {
        assert!(!circles_overlap(0.0, 0.0, 5.0, 10.0, 0.0, 5.0));
        assert!(circles_overlap(0.0, 0.0, 5.0, 9.9, 0.0, 5.0));
    }
}
