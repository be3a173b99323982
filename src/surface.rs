//! The drawing surface that trees are rendered onto
//!
//! Everything the tree knows about drawing goes through the [`Surface`] trait. The concrete raster
//! implementation lives in [`crate::img`]; tests use the recording double in [`recorder`].

use crate::img::{Color, PixelCount, Raster};
use crate::{Float, Point};

/// A 2D drawing surface with a canvas-like immediate mode API
///
/// Coordinates passed to the drawing methods are interpreted through the current transform, which
/// starts as the identity and is modified by [`translate`] and [`rotate`]. [`save`] and
/// [`restore`] push and pop that transform.
///
/// [`translate`]: Self::translate
/// [`rotate`]: Self::rotate
/// [`save`]: Self::save
/// [`restore`]: Self::restore
pub trait Surface {
    /// Width of the surface, in pixels
    fn width(&self) -> PixelCount;
    /// Height of the surface, in pixels
    fn height(&self) -> PixelCount;

    /// Resets the entire surface to its background
    fn clear(&mut self);

    /// Draws a straight line of the given width between two points
    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: Float);

    /// Draws a filled circle
    fn fill_circle(&mut self, center: Point, radius: Float, color: Color);

    fn save(&mut self);
    /// Restores the transform from the most recent [`save`](Self::save). Does nothing if there
    /// wasn't one.
    fn restore(&mut self);
    fn translate(&mut self, dx: Float, dy: Float);
    fn rotate(&mut self, angle: Float);

    /// Copies the region with top-left corner `(x, y)` and size `width`x`height` out of the
    /// surface, ignoring the current transform
    ///
    /// The region is clipped to the surface. Returns `None` if nothing is left after clipping.
    fn capture(
        &self,
        x: PixelCount,
        y: PixelCount,
        width: PixelCount,
        height: PixelCount,
    ) -> Option<Raster>;

    /// Draws `raster` with its top-left corner at `(x, y)`, ignoring the current transform
    ///
    /// Parts of the raster that fall outside the surface are dropped.
    fn draw_raster(&mut self, raster: &Raster, x: i64, y: i64);
}

#[cfg(test)]
pub mod recorder {
    //! A [`Surface`] that records the calls made to it instead of drawing anything

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Op {
        Clear,
        Line {
            from: Point,
            to: Point,
            color: Color,
            width: Float,
        },
        Circle {
            center: Point,
            radius: Float,
            color: Color,
        },
        Save,
        Restore,
        Translate(Float, Float),
        Rotate(Float),
        Raster {
            x: i64,
            y: i64,
            width: PixelCount,
            height: PixelCount,
        },
    }

    #[derive(Debug)]
    pub struct Recorder {
        pub width: PixelCount,
        pub height: PixelCount,
        pub ops: Vec<Op>,
    }

    impl Recorder {
        pub fn new(width: PixelCount, height: PixelCount) -> Self {
            Recorder {
                width,
                height,
                ops: Vec::new(),
            }
        }

        /// Returns the operations recorded since the last `clear`
        pub fn frame(&self) -> &[Op] {
            match self.ops.iter().rposition(|op| *op == Op::Clear) {
                Some(i) => &self.ops[i + 1..],
                None => &self.ops,
            }
        }

        pub fn count_lines(&self) -> usize {
            self.frame()
                .iter()
                .filter(|op| matches!(op, Op::Line { .. }))
                .count()
        }
    }

    impl Surface for Recorder {
        fn width(&self) -> PixelCount {
            self.width
        }

        fn height(&self) -> PixelCount {
            self.height
        }

        fn clear(&mut self) {
            self.ops.push(Op::Clear);
        }

        fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: Float) {
            self.ops.push(Op::Line {
                from,
                to,
                color,
                width,
            });
        }

        fn fill_circle(&mut self, center: Point, radius: Float, color: Color) {
            self.ops.push(Op::Circle {
                center,
                radius,
                color,
            });
        }

        fn save(&mut self) {
            self.ops.push(Op::Save);
        }

        fn restore(&mut self) {
            self.ops.push(Op::Restore);
        }

        fn translate(&mut self, dx: Float, dy: Float) {
            self.ops.push(Op::Translate(dx, dy));
        }

        fn rotate(&mut self, angle: Float) {
            self.ops.push(Op::Rotate(angle));
        }

        fn capture(
            &self,
            x: PixelCount,
            y: PixelCount,
            width: PixelCount,
            height: PixelCount,
        ) -> Option<Raster> {
            let width = width.min(self.width.saturating_sub(x));
            let height = height.min(self.height.saturating_sub(y));
            if width == 0 || height == 0 {
                return None;
            }

            Some(Raster::new(width, height))
        }

        fn draw_raster(&mut self, raster: &Raster, x: i64, y: i64) {
            self.ops.push(Op::Raster {
                x,
                y,
                width: raster.width(),
                height: raster.height(),
            });
        }
    }
}
