//! The [`Seed`] the tree grows out of

use crate::growth::Swell;
use crate::img::Color;
use crate::surface::Surface;
use crate::{Float, Point};

/// The y-coordinate past which a seed is allowed to move
const MOVE_THRESHOLD_Y: Float = 600.0;

/// A growing circle at the base of the tree
///
/// The seed swells to a radius of `2 * scale`, at which point it stops growing and the trunk
/// takes over. It is only drawn while it is still growing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Seed {
    point: Point,
    color: Color,
    scale: Float,
    swell: Swell,
}

impl Seed {
    pub fn new(point: Point, color: Color, scale: Float) -> Self {
        Seed {
            point,
            color,
            scale,
            swell: Swell::new(2.0 * scale),
        }
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn scale(&self) -> Float {
        self.scale
    }

    pub fn radius(&self) -> Float {
        self.swell.radius()
    }

    pub fn target_radius(&self) -> Float {
        self.swell.target()
    }

    pub fn is_active(&self) -> bool {
        self.swell.is_active()
    }

    pub fn grow(&mut self) {
        self.swell.grow();
    }

    /// Returns whether the radius is still short of its target
    pub fn can_grow(&self) -> bool {
        self.radius() < self.target_radius()
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        surface.fill_circle(self.point, self.radius(), self.color);
    }

    /// Returns whether `(x, y)` is strictly inside the seed
    pub fn hover(&self, x: Float, y: Float) -> bool {
        let r = self.radius();
        self.point.distance_squared(Point::new(x, y)) < r * r
    }

    // The remaining capabilities aren't used when growing a tree. They're there for drivers that
    // want to shrink or relocate a seed once it's done.

    pub fn can_move(&self) -> bool {
        self.point.y > MOVE_THRESHOLD_Y
    }

    pub fn move_by(&mut self, dx: Float, dy: Float) {
        self.point += Point::new(dx, dy);
    }

    pub fn can_scale(&self) -> bool {
        self.radius() > 2.0
    }

    pub fn scale_radius(&mut self, s: Float) {
        self.swell.scale(s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::img::rgb;

    fn seed(scale: Float) -> Seed {
        Seed::new(Point::new(300.0, 600.0), rgb(0x000000), scale)
    }

    #[test]
    fn grows_to_twice_scale() {
        let mut s = seed(1.5);
        let mut steps = 0;
        while s.is_active() {
            let before = s.radius();
            s.grow();
            assert!(s.radius() >= before);
            assert!(s.radius() <= 3.0);
            steps += 1;
        }

        assert_eq!(s.radius(), 3.0);
        assert!(!s.can_grow());
        // 0.05 + 0.10 + ... crosses 3.0 on the 11th step
        assert_eq!(steps, 11);
    }

    #[test]
    fn hover_uses_strict_inside() {
        let mut s = seed(1.0);
        while s.is_active() {
            s.grow();
        }

        assert!(s.hover(300.0, 600.0));
        assert!(s.hover(301.0, 601.0));
        assert!(!s.hover(302.0, 600.0));
    }

    #[test]
    fn move_threshold() {
        let mut s = seed(1.0);
        assert!(!s.can_move());
        s.move_by(0.0, 1.0);
        assert!(s.can_move());
        assert_eq!(s.point(), Point::new(300.0, 601.0));
    }

    #[test]
    fn scaling_radius() {
        let mut s = seed(2.0);
        while s.is_active() {
            s.grow();
        }
        assert!(s.can_scale());
        s.scale_radius(0.5);
        assert_eq!(s.radius(), 2.0);
        assert!(!s.can_scale());
        assert!(s.can_grow());
    }
}
