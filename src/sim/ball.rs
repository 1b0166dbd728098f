//! Bouncing ball

use core::time::Duration;

use super::Simulation;
use crate::config::Dimensions;
use crate::framebuffer::FrameBuffer;

/// Ball tuning
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BallConfig {
    /// Radius in pixels
    pub radius: i32,
    /// Pixels moved per frame on each axis
    pub step: i32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self { radius: 3, step: 3 }
    }
}

/// A filled circle reflecting off the screen edges
#[derive(Clone, Debug)]
pub struct BouncingBall {
    config: BallConfig,
    width: i32,
    height: i32,
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
}

impl BouncingBall {
    /// Start in the centre, moving down and to the right
    pub fn new(dimensions: Dimensions, config: BallConfig) -> Self {
        let width = i32::from(dimensions.width());
        let height = i32::from(dimensions.height());
        Self {
            config,
            width,
            height,
            x: width / 2,
            y: height / 2,
            dx: config.step,
            dy: config.step,
        }
    }

    /// Centre of the ball
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Per-frame velocity
    pub fn velocity(&self) -> (i32, i32) {
        (self.dx, self.dy)
    }
}

impl Simulation for BouncingBall {
    fn advance(&mut self, _dt: Duration) -> bool {
        let r = self.config.radius;
        self.x += self.dx;
        self.y += self.dy;
        if self.x - r <= 0 || self.x + r >= self.width - 1 {
            self.dx = -self.dx;
        }
        if self.y - r <= 0 || self.y + r >= self.height - 1 {
            self.dy = -self.dy;
        }
        false
    }

    fn render<B>(&mut self, frame: &mut FrameBuffer<B>)
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        frame.clear();
        frame.draw_circle(self.x, self.y, self.config.radius, true);
    }
}
