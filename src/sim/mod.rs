//! Frame-stepped simulations
//!
//! Every simulation follows the same two-phase contract driven by
//! [`run`](crate::runner::run):
//!
//! 1. [`Simulation::advance`] moves entities, fires timers and reports
//!    whether a terminal state (a win or a loss) was reached.
//! 2. [`Simulation::render`] draws the current state into the framebuffer.
//!
//! Simulations own their tuning parameters; nothing is shared between
//! instances.
//!
//! | Simulation           | Terminal states            |
//! |----------------------|----------------------------|
//! | [`BouncingBall`]     | none                       |
//! | [`Life`]             | none                       |
//! | [`Pong`]             | none (misses only score)   |
//! | [`Invaders`]         | player or invaders win     |
//! | [`RotatingCube`]     | none                       |
//! | [`Clock`]            | none                       |
//! | [`PrimeTicker`]      | none                       |

use core::time::Duration;

use crate::framebuffer::FrameBuffer;

mod ball;
mod clock;
mod cube;
mod invaders;
mod life;
mod pong;
mod primes;
pub mod rng;

pub use ball::{BallConfig, BouncingBall};
pub use clock::{Clock, ClockTime, SteppedClock, TimeSource};
pub use cube::{CubeConfig, RotatingCube};
pub use invaders::{Difficulty, Invaders, InvadersConfig, Outcome, Scoreboard};
pub use life::{CellGrid, Life, LifeConfig};
pub use pong::{Pong, PongConfig};
pub use primes::PrimeTicker;

/// A per-frame state update plus a draw step
pub trait Simulation {
    /// Advance the state by one frame of `dt` wall time
    ///
    /// Returns `true` when the simulation reached a terminal state. The
    /// caller renders that state once more and then calls
    /// [`reset`](Self::reset).
    fn advance(&mut self, dt: Duration) -> bool;

    /// Draw the current state
    fn render<B>(&mut self, frame: &mut FrameBuffer<B>)
    where
        B: AsRef<[u8]> + AsMut<[u8]>;

    /// Start over after a terminal state
    fn reset(&mut self) {}
}
