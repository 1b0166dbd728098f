//! Plain coordinate types
//!
//! Screen coordinates are signed so that entities may drift past an edge:
//! anything drawn there is clipped by the framebuffer.

/// A point on the pixel grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column, 0 at the left edge
    pub x: i32,
    /// Row, 0 at the top edge
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A point in model space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3 {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
    /// Z coordinate (depth)
    pub z: f32,
}

impl Point3 {
    /// Create a new point
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub w: i32,
    /// Height in pixels
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Hit test against `[x, x + w] x [y, y + h]`
    ///
    /// Both far edges are inclusive, so a point exactly on the right or
    /// bottom border counts as inside.
    ///
    /// ```
    /// use ssd1306_sim::geometry::{Point, Rect};
    ///
    /// let enemy = Rect::new(10, 5, 5, 3);
    /// assert!(enemy.contains(Point::new(15, 8)));
    /// assert!(!enemy.contains(Point::new(16, 8)));
    /// ```
    pub const fn contains(&self, p: Point) -> bool {
        let (px, py) = (p.x as i64, p.y as i64);
        let (x, y) = (self.x as i64, self.y as i64);
        x <= px && px <= x + self.w as i64 && y <= py && py <= y + self.h as i64
    }

    /// Top-left corner
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
