//! Raster rendering of trees: colors and the [`ImageSurface`] implementation of [`Surface`]

use crate::surface::Surface;
use crate::{Float, Point};

use eyre::{eyre, WrapErr};
use image::{GenericImageView, ImageBuffer, Rgba};
use imageproc::drawing::{self, Blend, Canvas};
use std::path::Path;

/// Creates a color from the provided RGBA integer
///
/// See also: [`rgb`].
///
/// ## Examples
///
/// ```
/// use bloom_tree::img::rgba;
///
/// let transparent = rgba(0x00000000);
/// let red_tint = rgba(0xff000077);
/// let teal = rgba(0x00ffffff);
/// ```
pub fn rgba(int: u32) -> Color {
    let r = ((int >> 24) & 0xff) as u8;
    let g = ((int >> 16) & 0xff) as u8;
    let b = ((int >> 8) & 0xff) as u8;
    let a = (int & 0xff) as u8;

    Rgba([r, g, b, a])
}

/// Creates a color from the provided RGB integer
///
/// See also: [`rgba`].
///
/// ## Panics
///
/// This function panics if the provided integer is greater than `0xffffff`.
pub fn rgb(int: u32) -> Color {
    assert!(int <= 0xffffff);

    rgba((int << 8) + 0xff)
}

/// Parses a color written the way stylesheets write them
///
/// Accepted forms are `#rgb`, `#rrggbb`, `#rrggbbaa` and a small set of names (`black`, `white`,
/// `red`, `green`, `blue`, `pink`, `transparent`, ...). Whitespace around the value is ignored.
pub fn parse_color(s: &str) -> eyre::Result<Color> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        // from_str_radix alone would also take a leading sign
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(eyre!("{:?} is not a hexadecimal color", s));
        }

        let digits = u32::from_str_radix(hex, 16)
            .map_err(|_| eyre!("{:?} is not a hexadecimal color", s))?;

        return match hex.len() {
            // #rgb -> #rrggbb, by repeating each nibble
            3 => {
                let (r, g, b) = ((digits >> 8) & 0xf, (digits >> 4) & 0xf, digits & 0xf);
                Ok(rgb((r * 0x11) << 16 | (g * 0x11) << 8 | (b * 0x11)))
            }
            6 => Ok(rgb(digits)),
            8 => Ok(rgba(digits)),
            n => Err(eyre!("hex color {:?} has {} digits, expected 3, 6 or 8", s, n)),
        };
    }

    let color = match s.to_ascii_lowercase().as_str() {
        "black" => rgb(0x000000),
        "white" => rgb(0xffffff),
        "red" => rgb(0xff0000),
        "green" => rgb(0x008000),
        "blue" => rgb(0x0000ff),
        "yellow" => rgb(0xffff00),
        "orange" => rgb(0xffa500),
        "pink" => rgb(0xffc0cb),
        "brown" => rgb(0xa52a2a),
        "gray" | "grey" => rgb(0x808080),
        "transparent" => rgba(0x00000000),
        _ => return Err(eyre!("unknown color name {:?}", s)),
    };

    Ok(color)
}

/// The color type we're using
pub type Color = Rgba<u8>;

/// A standalone RGBA image, as produced by [`Surface::capture`]
pub type Raster = ImageBuffer<Color, Vec<u8>>;

/// Type alias to represent a number of pixels. This is only provided so that the meaning behind
/// types can be more clear.
pub type PixelCount = u32;

/// Helper type alias
type ImageCanvas = Blend<Raster>;

/// Row-major 2x3 affine matrix `[a, b, c, d, e, f]`, mapping `(x, y)` to
/// `(a*x + c*y + e, b*x + d*y + f)`
type Transform = [Float; 6];

const IDENTITY: Transform = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Helper struct to record position of the endpoints of a line, already in image coordinates
#[derive(Copy, Clone, Debug)]
struct StemPos {
    start: Point,
    end: Point,
    /// The angle of the line - i.e. the rotation from the X axis that would be required to move
    /// `start` and `end` from the X axis into their current position
    angle: Float,
}

#[rustfmt::skip]
impl StemPos {
    /// Gives the top-left corner of the rotated rectangle representing a line at this position and
    /// angle with a half-width of `r`
    fn top_left(&self, r: Float) -> Point {
        Point { x: self.start.x + r * self.angle.sin(), y: self.start.y - r * self.angle.cos() }
    }

    fn top_right(&self, r: Float) -> Point {
        Point { x: self.start.x - r * self.angle.sin(), y: self.start.y + r * self.angle.cos() }
    }

    fn bot_left(&self, r: Float) -> Point {
        Point { x: self.end.x + r * self.angle.sin(), y: self.end.y - r * self.angle.cos() }
    }

    fn bot_right(&self, r: Float) -> Point {
        Point { x: self.end.x - r * self.angle.sin(), y: self.end.y + r * self.angle.cos() }
    }
}

/// A [`Surface`] backed by an in-memory RGBA image
///
/// Drawing alpha-blends onto the image. Clearing resets every pixel to the background color the
/// surface was created with.
pub struct ImageSurface {
    canvas: ImageCanvas,
    background: Color,
    transform: Transform,
    saved: Vec<Transform>,
}

impl ImageSurface {
    pub fn new(width: PixelCount, height: PixelCount, background: Color) -> Self {
        ImageSurface {
            canvas: Blend(ImageBuffer::from_pixel(width, height, background)),
            background,
            transform: IDENTITY,
            saved: Vec::new(),
        }
    }

    /// Returns the image as it currently stands
    pub fn image(&self) -> &Raster {
        &self.canvas.0
    }

    /// Writes the current image to `path` as a PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> eyre::Result<()> {
        let path = path.as_ref();
        self.canvas
            .0
            .save(path)
            .wrap_err_with(|| format!("failed to write image to {:?}", path.to_string_lossy()))
    }

    /// Maps a point through the current transform
    fn apply(&self, p: Point) -> Point {
        let [a, b, c, d, e, f] = self.transform;
        Point {
            x: a * p.x + c * p.y + e,
            y: b * p.x + d * p.y + f,
        }
    }
}

fn to_coords(p: Point) -> imageproc::point::Point<i32> {
    imageproc::point::Point {
        x: p.x.round() as i32,
        y: p.y.round() as i32,
    }
}

impl Surface for ImageSurface {
    fn width(&self) -> PixelCount {
        self.canvas.0.width()
    }

    fn height(&self) -> PixelCount {
        self.canvas.0.height()
    }

    fn clear(&mut self) {
        let background = self.background;
        self.canvas.0.pixels_mut().for_each(|p| *p = background);
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: Float) {
        let (start, end) = (self.apply(from), self.apply(to));

        // Wide lines aren't provided by imageproc, so anything thicker than a pixel is drawn as a
        // rotated rectangle. There's no antialiasing on polygons, unfortunately.
        let d = end - start;
        let stem = StemPos {
            start,
            end,
            angle: d.y.atan2(d.x),
        };

        let r = width / 2.0;
        let poly_points = [
            to_coords(stem.top_left(r)),
            to_coords(stem.top_right(r)),
            to_coords(stem.bot_right(r)),
            to_coords(stem.bot_left(r)),
        ];

        // imageproc refuses polygons whose first and last points coincide, which happens for very
        // short lines once everything is rounded to pixels.
        if width <= 1.0 || poly_points[0] == poly_points[3] {
            drawing::draw_line_segment_mut(
                &mut self.canvas,
                (start.x, start.y),
                (end.x, end.y),
                color,
            );
        } else {
            drawing::draw_polygon_mut(&mut self.canvas, &poly_points, color);
        }
    }

    fn fill_circle(&mut self, center: Point, radius: Float, color: Color) {
        if radius <= 0.0 {
            return;
        }

        // Only translations and rotations are ever applied, so the radius is unchanged.
        let c = to_coords(self.apply(center));
        let radius_px = radius.round() as i32;

        drawing::draw_filled_circle_mut(&mut self.canvas, (c.x, c.y), radius_px, color);
    }

    fn save(&mut self) {
        self.saved.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.saved.pop() {
            self.transform = t;
        }
    }

    fn translate(&mut self, dx: Float, dy: Float) {
        let [a, b, c, d, e, f] = self.transform;
        self.transform[4] = a * dx + c * dy + e;
        self.transform[5] = b * dx + d * dy + f;
    }

    fn rotate(&mut self, angle: Float) {
        let (sin, cos) = angle.sin_cos();
        let [a, b, c, d, e, f] = self.transform;
        self.transform = [
            a * cos + c * sin,
            b * cos + d * sin,
            c * cos - a * sin,
            d * cos - b * sin,
            e,
            f,
        ];
    }

    fn capture(
        &self,
        x: PixelCount,
        y: PixelCount,
        width: PixelCount,
        height: PixelCount,
    ) -> Option<Raster> {
        let img = &self.canvas.0;
        let width = width.min(img.width().saturating_sub(x));
        let height = height.min(img.height().saturating_sub(y));
        if width == 0 || height == 0 {
            return None;
        }

        Some(img.view(x, y, width, height).to_image())
    }

    fn draw_raster(&mut self, raster: &Raster, x: i64, y: i64) {
        let (w, h) = (self.width() as i64, self.height() as i64);

        for (rx, ry, pixel) in raster.enumerate_pixels() {
            let (tx, ty) = (x + rx as i64, y + ry as i64);
            if (0..w).contains(&tx) && (0..h).contains(&ty) {
                self.canvas.draw_pixel(tx as u32, ty as u32, *pixel);
            }
        }
    }
}
