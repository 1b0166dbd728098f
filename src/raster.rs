//! Rasterization algorithms
//!
//! Stateless shape walkers that yield the lattice points of a primitive. The
//! [`FrameBuffer`](crate::FrameBuffer) drawing methods feed these into
//! `set_pixel`; the same iterators can be used to hit-test or count pixels
//! without touching a buffer.
//!
//! - [`Line`]: integer Bresenham, endpoints inclusive, every point once
//! - [`filled_circle`]: every point with `i*i + j*j <= r*r`
//! - [`glyph_blocks`]: set bits of a column-major glyph, as magnified blocks
//!
//! Intermediate arithmetic is done in `i64`, so coordinates anywhere in the
//! `i32` range are accepted.
//!
//! The module also holds the small amount of 3D math the wireframe demo
//! needs ([`rotate`], [`project`]).
//!
//! ## Example
//!
//! ```
//! use ssd1306_sim::geometry::Point;
//! use ssd1306_sim::raster::Line;
//!
//! let points: Vec<Point> = Line::new(Point::new(0, 0), Point::new(3, 1)).collect();
//! assert_eq!(points.first(), Some(&Point::new(0, 0)));
//! assert_eq!(points.last(), Some(&Point::new(3, 1)));
//! assert_eq!(points.len(), 4);
//! ```

use core::ops::RangeInclusive;

use crate::geometry::{Point, Point3, Rect};

/// Bresenham line walker
///
/// Yields every point of the 8-connected line from `start` to `end`,
/// both inclusive, with no duplicates. A zero-length line yields exactly
/// one point.
#[derive(Clone, Debug)]
pub struct Line {
    x: i32,
    y: i32,
    end: Point,
    dx: i64,
    dy: i64,
    sx: i32,
    sy: i32,
    err: i64,
    done: bool,
}

impl Line {
    /// Create a walker between two points
    pub fn new(start: Point, end: Point) -> Self {
        let dx = (i64::from(end.x) - i64::from(start.x)).abs();
        let dy = (i64::from(end.y) - i64::from(start.y)).abs();
        Self {
            x: start.x,
            y: start.y,
            end,
            dx,
            dy,
            sx: if start.x < end.x { 1 } else { -1 },
            sy: if start.y < end.y { 1 } else { -1 },
            err: dx - dy,
            done: false,
        }
    }
}

impl Iterator for Line {
    type Item = Point;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = Point::new(self.x, self.y);
        if current == self.end {
            self.done = true;
        } else {
            let e2 = 2 * self.err;
            if e2 > -self.dy {
                self.err -= self.dy;
                self.x += self.sx;
            }
            if e2 < self.dx {
                self.err += self.dx;
                self.y += self.sy;
            }
        }
        Some(current)
    }
}

impl core::iter::FusedIterator for Line {}

/// Points of a filled circle
///
/// Scans the bounding square `[-r, r]` on both axes and keeps offsets
/// inside the radius. A negative radius yields nothing; zero yields the
/// centre only.
pub fn filled_circle(center: Point, r: i32) -> impl Iterator<Item = Point> {
    let full = i64::from(i32::MIN)..=i64::from(i32::MAX);
    filled_circle_within(center, r, full.clone(), full)
}

/// [`filled_circle`] restricted to the columns `xs` and rows `ys`
///
/// Only the part of the bounding square inside the window is scanned, so
/// a huge radius costs no more than the window's area.
pub(crate) fn filled_circle_within(
    center: Point,
    r: i32,
    xs: RangeInclusive<i64>,
    ys: RangeInclusive<i64>,
) -> impl Iterator<Item = Point> {
    let r = i64::from(r);
    let r2 = r * r;
    let (cx, cy) = (i64::from(center.x), i64::from(center.y));
    let columns = (-r).max(xs.start() - cx)..=r.min(xs.end() - cx);
    let (top, bottom) = ((-r).max(ys.start() - cy), r.min(ys.end() - cy));
    columns.flat_map(move |i| {
        (top..=bottom).filter_map(move |j| {
            // |j| <= r, so the right side never goes negative
            (i * i <= r2 - j * j).then(|| Point::new((cx + i) as i32, (cy + j) as i32))
        })
    })
}

/// Set bits of a glyph, each as a `scale x scale` block
///
/// `columns` is column-major: bit `k` of `columns[c]` is the pixel at
/// `(origin.x + c, origin.y + k)` before magnification. Clear bits yield
/// nothing, so the glyph background is left untouched. Block corners past
/// the `i32` range saturate; such blocks are never on screen.
pub fn glyph_blocks(origin: Point, columns: &[u8], scale: i32) -> impl Iterator<Item = Rect> + '_ {
    let step = i64::from(scale);
    (0i64..).zip(columns).flat_map(move |(c, &bits)| {
        (0i64..8).filter(move |&k| bits & (1u8 << k) != 0).map(move |k| {
            let left = saturate(i64::from(origin.x) + c * step);
            let top = saturate(i64::from(origin.y) + k * step);
            Rect::new(left, top, scale, scale)
        })
    })
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Rotate a point about the origin, around X, then Y, then Z
///
/// Angles are in radians.
pub fn rotate(p: Point3, angle_x: f32, angle_y: f32, angle_z: f32) -> Point3 {
    let (sin_x, cos_x) = (libm::sinf(angle_x), libm::cosf(angle_x));
    let (sin_y, cos_y) = (libm::sinf(angle_y), libm::cosf(angle_y));
    let (sin_z, cos_z) = (libm::sinf(angle_z), libm::cosf(angle_z));

    // X axis
    let y1 = p.y * cos_x - p.z * sin_x;
    let z1 = p.y * sin_x + p.z * cos_x;

    // Y axis
    let x2 = p.x * cos_y + z1 * sin_y;
    let z2 = -p.x * sin_y + z1 * cos_y;

    // Z axis
    let x3 = x2 * cos_z - y1 * sin_z;
    let y3 = x2 * sin_z + y1 * cos_z;

    Point3::new(x3, y3, z2)
}

/// Orthographic projection onto the screen
///
/// Depth is dropped; there is no perspective divide.
pub fn project(p: Point3, center: Point, scale: f32) -> Point {
    Point::new(
        libm::roundf(p.x * scale + center.x as f32) as i32,
        libm::roundf(p.y * scale + center.y as f32) as i32,
    )
}
