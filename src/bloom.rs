//! Branch tips: [`Bloom`]s that grow once a branch stops, and the [`Flower`]s placed on them

use crate::growth::Swell;
use crate::img::Color;
use crate::surface::Surface;
use crate::{float, Float, Point};

use rand::Rng;

/// Bounds on the randomly-chosen final radius of a bloom, as `[MIN, MAX)`
const BLOOM_RADIUS: (Float, Float) = (2.0, 4.0);

/// Distance of each petal's center from the center of the flower, before scaling
const PETAL_OFFSET: Float = 5.0;
/// Radius of each petal, before scaling
const PETAL_RADIUS: Float = 4.0;
const PETAL_COUNT: usize = 4;

/// Unique identifier for a [`Bloom`] within the tree that owns it
///
/// Blooms are only ever appended, so an id stays valid for the lifetime of its tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BloomId(usize);

impl BloomId {
    pub(crate) fn new(idx: usize) -> Self {
        BloomId(idx)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// A small growing circle at the tip of a branch that has stopped growing
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bloom {
    point: Point,
    color: Color,
    swell: Swell,
}

impl Bloom {
    pub fn new(point: Point, color: Color, rng: &mut impl Rng) -> Self {
        let (lo, hi) = BLOOM_RADIUS;
        Bloom {
            point,
            color,
            swell: Swell::new(rng.gen_range(lo, hi)),
        }
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn color(&self) -> Color {
        self.color
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

    pub fn draw(&self, surface: &mut impl Surface) {
        surface.save();
        surface.fill_circle(self.point, self.radius(), self.color);
        surface.restore();
    }
}

/// A decorative four-petal shape, anchored at a bloom
///
/// Flowers never change once they've been made.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Flower {
    point: Point,
    color: Color,
    angle: Float,
    scale: Float,
}

impl Flower {
    pub fn new(point: Point, color: Color, angle: Float, scale: Float) -> Self {
        Flower {
            point,
            color,
            angle,
            scale,
        }
    }

    /// Makes a flower on top of `bloom`, with a random rotation
    pub fn on(bloom: &Bloom, rng: &mut impl Rng) -> Self {
        let angle = rng.gen::<Float>() * 2.0 * float::PI;
        Flower::new(bloom.point(), bloom.color(), angle, 1.0)
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn angle(&self) -> Float {
        self.angle
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        surface.save();
        surface.translate(self.point.x, self.point.y);
        surface.rotate(self.angle);

        let petal = Point::new(PETAL_OFFSET * self.scale, 0.0);
        for _ in 0..PETAL_COUNT {
            surface.fill_circle(petal, PETAL_RADIUS * self.scale, self.color);
            surface.rotate(float::FRAC_PI_2);
        }

        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::img::rgb;
    use crate::surface::recorder::{Op, Recorder};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn bloom_target_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let b = Bloom::new(Point::default(), rgb(0xffffff), &mut rng);
            assert!((2.0..4.0).contains(&b.target_radius()));
        }
    }

    #[test]
    fn bloom_grows_then_stops() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut b = Bloom::new(Point::new(1.0, 2.0), rgb(0xff0000), &mut rng);
        let mut last = b.radius();
        while b.is_active() {
            b.grow();
            assert!(b.radius() >= last && b.radius() <= b.target_radius());
            last = b.radius();
        }
        assert_eq!(b.radius(), b.target_radius());
    }

    #[test]
    fn flower_restores_transform() {
        let mut surface = Recorder::new(100, 100);
        let flower = Flower::new(Point::new(10.0, 20.0), rgb(0xff00ff), 0.5, 1.0);
        flower.draw(&mut surface);

        let ops = &surface.ops;
        assert_eq!(ops.first(), Some(&Op::Save));
        assert_eq!(ops.last(), Some(&Op::Restore));
        assert_eq!(ops[1], Op::Translate(10.0, 20.0));
        assert_eq!(ops[2], Op::Rotate(0.5));

        let petals: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                Op::Circle { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .collect();
        assert_eq!(petals, vec![(Point::new(5.0, 0.0), 4.0); 4]);

        let quarter_turns = ops
            .iter()
            .filter(|op| **op == Op::Rotate(float::FRAC_PI_2))
            .count();
        assert_eq!(quarter_turns, 4);
    }
}
