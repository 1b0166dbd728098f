//! Two-paddle Pong with both sides played by the computer

use core::time::Duration;

use rand::rngs::SmallRng;

use super::{Simulation, rng};
use crate::config::Dimensions;
use crate::framebuffer::FrameBuffer;

/// Pong tuning
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PongConfig {
    /// Paddle width in pixels
    pub paddle_width: i32,
    /// Paddle height in pixels
    pub paddle_height: i32,
    /// Side of the square ball
    pub ball_size: i32,
    /// Pixels a paddle moves per frame
    pub paddle_speed: i32,
    /// Pixels the ball moves per frame on each axis
    pub ball_speed: i32,
    /// Seed for serve directions
    pub seed: u64,
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            paddle_width: 2,
            paddle_height: 12,
            ball_size: 2,
            paddle_speed: 8,
            ball_speed: 5,
            seed: rng::DEFAULT_SEED,
        }
    }
}

/// Pong simulation
///
/// A paddle only moves while the ball is heading its way. A missed ball
/// scores for the opposite side and is served again from the centre.
#[derive(Clone, Debug)]
pub struct Pong {
    config: PongConfig,
    width: i32,
    height: i32,
    left_y: i32,
    right_y: i32,
    ball_x: i32,
    ball_y: i32,
    dx: i32,
    dy: i32,
    left_score: u32,
    right_score: u32,
    rng: SmallRng,
}

impl Pong {
    /// Paddles centred, ball served from the centre in a random direction
    pub fn new(dimensions: Dimensions, config: PongConfig) -> Self {
        let width = i32::from(dimensions.width());
        let height = i32::from(dimensions.height());
        let paddle_y = (height - config.paddle_height) / 2;
        let mut pong = Self {
            config,
            width,
            height,
            left_y: paddle_y,
            right_y: paddle_y,
            ball_x: 0,
            ball_y: 0,
            dx: 0,
            dy: 0,
            left_score: 0,
            right_score: 0,
            rng: rng::seeded(config.seed),
        };
        pong.serve();
        pong
    }

    fn serve(&mut self) {
        self.ball_x = self.width / 2;
        self.ball_y = self.height / 2;
        self.dx = rng::sign(&mut self.rng) * self.config.ball_speed;
        self.dy = rng::sign(&mut self.rng) * self.config.ball_speed;
    }

    /// Move a paddle centre one step toward `target_y`, kept on screen
    fn track(&self, paddle_y: i32, target_y: i32) -> i32 {
        let centre = paddle_y + self.config.paddle_height / 2;
        let moved = match centre.cmp(&target_y) {
            core::cmp::Ordering::Less => paddle_y + self.config.paddle_speed,
            core::cmp::Ordering::Greater => paddle_y - self.config.paddle_speed,
            core::cmp::Ordering::Equal => paddle_y,
        };
        moved.clamp(0, self.height - self.config.paddle_height)
    }

    fn returns(&self, paddle_y: i32) -> bool {
        paddle_y <= self.ball_y && self.ball_y <= paddle_y + self.config.paddle_height
    }

    /// Points scored by the left and right side
    pub fn score(&self) -> (u32, u32) {
        (self.left_score, self.right_score)
    }

    /// Top-left corner of the ball
    pub fn ball(&self) -> (i32, i32) {
        (self.ball_x, self.ball_y)
    }

    /// Top edges of the left and right paddles
    pub fn paddles(&self) -> (i32, i32) {
        (self.left_y, self.right_y)
    }
}

impl Simulation for Pong {
    fn advance(&mut self, _dt: Duration) -> bool {
        let c = self.config;
        self.ball_x += self.dx;
        self.ball_y += self.dy;

        if self.ball_y <= 0 || self.ball_y >= self.height - c.ball_size {
            self.dy = -self.dy;
        }

        if self.ball_x <= c.paddle_width {
            if self.returns(self.left_y) {
                self.dx = -self.dx;
                self.dy = rng::sign(&mut self.rng) * c.ball_speed;
            } else {
                self.right_score += 1;
                log::debug!("pong: left miss, score {}-{}", self.left_score, self.right_score);
                self.serve();
            }
        }

        if self.ball_x >= self.width - c.paddle_width - c.ball_size {
            if self.returns(self.right_y) {
                self.dx = -self.dx;
                self.dy = rng::sign(&mut self.rng) * c.ball_speed;
            } else {
                self.left_score += 1;
                log::debug!("pong: right miss, score {}-{}", self.left_score, self.right_score);
                self.serve();
            }
        }

        if self.dx < 0 {
            self.left_y = self.track(self.left_y, self.ball_y);
        } else {
            self.right_y = self.track(self.right_y, self.ball_y);
        }
        false
    }

    fn render<B>(&mut self, frame: &mut FrameBuffer<B>)
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let c = self.config;
        frame.clear();
        frame.fill_rect(0, self.left_y, c.paddle_width, c.paddle_height, true);
        frame.fill_rect(
            self.width - c.paddle_width,
            self.right_y,
            c.paddle_width,
            c.paddle_height,
            true,
        );
        frame.fill_rect(self.ball_x, self.ball_y, c.ball_size, c.ball_size, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(5);

    fn pong() -> Pong {
        Pong::new(Dimensions::default(), PongConfig::default())
    }

    #[test]
    fn test_serves_from_centre_at_full_speed() {
        let game = pong();
        assert_eq!(game.ball(), (64, 32));
        assert_eq!(game.paddles(), (26, 26));
        assert_eq!(game.dx.abs(), 5);
        assert_eq!(game.dy.abs(), 5);
    }

    #[test]
    fn test_miss_scores_for_opposite_side_and_reserves() {
        let mut game = pong();
        game.ball_x = 4;
        game.ball_y = 60;
        game.dx = -5;
        game.dy = 0;
        game.left_y = 0;
        game.advance(FRAME);
        assert_eq!(game.score(), (0, 1));
        assert_eq!(game.ball(), (64, 32));
    }

    #[test]
    fn test_paddle_returns_ball() {
        let mut game = pong();
        game.ball_x = 60;
        game.ball_y = 30;
        game.dx = 5;
        game.dy = 0;
        game.right_y = 24;
        // 60 -> 65 -> ... -> 125 hits the right paddle zone (>= 124)
        for _ in 0..13 {
            game.advance(FRAME);
        }
        assert!(game.dx < 0);
        assert_eq!(game.score(), (0, 0));
    }

    #[test]
    fn test_only_paddle_facing_ball_moves() {
        let mut game = pong();
        game.ball_x = 64;
        game.ball_y = 5;
        game.dx = 5;
        game.dy = 0;
        game.advance(FRAME);
        assert_eq!(game.paddles(), (26, 18));
    }

    #[test]
    fn test_paddles_stay_on_screen() {
        let mut game = pong();
        for _ in 0..2000 {
            game.advance(FRAME);
            let (l, r) = game.paddles();
            assert!((0..=52).contains(&l));
            assert!((0..=52).contains(&r));
        }
    }

    #[test]
    fn test_render_draws_paddles_and_ball() {
        let mut game = pong();
        let mut fb = FrameBuffer::new_vec(Dimensions::default());
        game.render(&mut fb);
        assert!(fb.get_pixel(0, 26));
        assert!(fb.get_pixel(1, 37));
        assert!(fb.get_pixel(127, 26));
        assert!(fb.get_pixel(65, 33));
        let lit: u32 = fb.as_bytes().iter().map(|b| b.count_ones()).sum();
        assert_eq!(lit, 2 * 24 + 4);
    }
}
