//! Wrapper module around the `Point` type

use crate::Float;
use std::ops::*;

/// A point on the drawing surface
///
/// Values are in surface pixels. Positive X is to the right and, unlike a textbook plane,
/// positive Y is *down*: the tree grows from the bottom edge of the surface towards `y = 0`, which
/// is why an upright trunk has an angle of `-π/2`.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Point {
    pub x: Float,
    pub y: Float,
}

impl Point {
    pub const fn new(x: Float, y: Float) -> Self {
        Point { x, y }
    }

    /// Returns the point reached by travelling `length` from `self` in the direction of `angle`
    /// (radians, clockwise from the positive X axis in screen coordinates)
    pub fn offset(self, length: Float, angle: Float) -> Self {
        Point {
            // x + L*cos(θ)
            x: self.x + length * angle.cos(),
            // y + L*sin(θ)
            y: self.y + length * angle.sin(),
        }
    }

    /// Returns the squared distance between the two points
    pub fn distance_squared(self, other: Point) -> Float {
        let d = self - other;
        d.x * d.x + d.y * d.y
    }

    /// Rotates the point about the origin by `angle` radians
    pub fn rotate(self, angle: Float) -> Self {
        let (sin, cos) = angle.sin_cos();
        Point {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

impl Add<Point> for Point {
    type Output = Self;

    fn add(self, other: Point) -> Self {
        Point {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign<Point> for Point {
    fn add_assign(&mut self, other: Point) {
        *self = *self + other;
    }
}

impl Sub<Point> for Point {
    type Output = Self;

    fn sub(self, other: Point) -> Self {
        self + -1.0 * other
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        self * -1.0
    }
}

impl Mul<Point> for Float {
    type Output = Point;

    fn mul(self, point: Point) -> Point {
        point * self
    }
}

impl Mul<Float> for Point {
    type Output = Self;

    fn mul(self, scale: Float) -> Self {
        Point {
            x: scale * self.x,
            y: scale * self.y,
        }
    }
}

impl MulAssign<Float> for Point {
    fn mul_assign(&mut self, scale: Float) {
        *self = *self * scale;
    }
}
