//! Rotating wireframe cube
//!
//! Each frame the eight vertices are rotated and projected once, the twelve
//! edges are drawn into a scratch framebuffer, and only pages that differ
//! from the previous picture are copied over. Depth is ignored: back edges
//! draw over front edges.

use core::time::Duration;

use super::Simulation;
use crate::config::{Dimensions, MAX_BUFFER_SIZE};
use crate::framebuffer::FrameBuffer;
use crate::geometry::{Point, Point3};
use crate::raster::{project, rotate};

/// Vertex index pairs: back face, front face, connecting edges
const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Cube tuning
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeConfig {
    /// Edge length in pixels
    pub size: f32,
    /// Radians added per frame around X, Y and Z
    pub angle_step: (f32, f32, f32),
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            size: 30.0,
            angle_step: (0.1, 0.07, 0.05),
        }
    }
}

/// Rotating cube simulation
#[derive(Clone, Debug)]
pub struct RotatingCube {
    config: CubeConfig,
    center: Point,
    vertices: [Point3; 8],
    angles: (f32, f32, f32),
}

impl RotatingCube {
    /// Cube centred on the screen, unrotated
    pub fn new(dimensions: Dimensions, config: CubeConfig) -> Self {
        let h = config.size / 2.0;
        Self {
            config,
            center: Point::new(
                i32::from(dimensions.width()) / 2,
                i32::from(dimensions.height()) / 2,
            ),
            vertices: [
                Point3::new(-h, -h, -h),
                Point3::new(h, -h, -h),
                Point3::new(h, h, -h),
                Point3::new(-h, h, -h),
                Point3::new(-h, -h, h),
                Point3::new(h, -h, h),
                Point3::new(h, h, h),
                Point3::new(-h, h, h),
            ],
            angles: (0.0, 0.0, 0.0),
        }
    }

    /// Current rotation around X, Y and Z in radians
    pub fn angles(&self) -> (f32, f32, f32) {
        self.angles
    }

    /// Screen positions of the eight vertices at the current angles
    pub fn projected(&self) -> [Point; 8] {
        let (ax, ay, az) = self.angles;
        self.vertices
            .map(|v| project(rotate(v, ax, ay, az), self.center, 1.0))
    }
}

impl Simulation for RotatingCube {
    fn advance(&mut self, _dt: Duration) -> bool {
        let (sx, sy, sz) = self.config.angle_step;
        self.angles.0 += sx;
        self.angles.1 += sy;
        self.angles.2 += sz;
        false
    }

    fn render<B>(&mut self, frame: &mut FrameBuffer<B>)
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let points = self.projected();
        let dims = frame.dimensions();
        let mut scratch = [0u8; MAX_BUFFER_SIZE];
        let Ok(mut next) = FrameBuffer::try_new(&mut scratch[..], dims) else {
            return;
        };
        for (a, b) in EDGES {
            let (p, q) = (points[a], points[b]);
            next.draw_line(p.x, p.y, q.x, q.y, true);
        }
        let changed = frame.replace_with(&next);
        log::trace!("cube: pages changed {:#010b}", changed);
    }
}
