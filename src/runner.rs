//! Frame loop tying a [`Simulation`] to a [`Display`]
//!
//! ```
//! use ssd1306_sim::sim::{BallConfig, BouncingBall};
//! use ssd1306_sim::{Config, Display, DisplayInterface, RunOptions, run};
//! # struct Sink;
//! # impl DisplayInterface for Sink {
//! #     type Error = core::convert::Infallible;
//! #     fn send_command(&mut self, _command: u8) -> Result<(), Self::Error> { Ok(()) }
//! #     fn send_data(&mut self, _data: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct NoDelay;
//! # impl embedded_hal::delay::DelayNs for NoDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! let config = Config::default();
//! let mut ball = BouncingBall::new(config.dimensions, BallConfig::default());
//! let mut display = Display::new(Sink, config, [0u8; 1024]);
//!
//! let options = RunOptions {
//!     max_frames: Some(50),
//!     ..RunOptions::default()
//! };
//! let summary = run(&mut display, &mut ball, &mut NoDelay, options);
//! assert_eq!(summary.map(|s| s.frames).ok(), Some(50));
//! ```

use core::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::display::Display;
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::sim::Simulation;

/// Run loop pacing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Pause after each frame; also the `dt` handed to `advance`
    pub frame_delay_ms: u32,
    /// Stop after this many frames; `None` runs until the process ends
    pub max_frames: Option<u32>,
    /// How long a result screen stays up before the simulation resets
    pub terminal_hold_ms: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frame_delay_ms: 20,
            max_frames: None,
            terminal_hold_ms: 2000,
        }
    }
}

/// What a finished run did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames advanced and rendered; saturates at `u32::MAX`
    pub frames: u32,
    /// Terminal states reached (each followed by a reset)
    pub rounds: u32,
}

/// Drive `simulation` on `display` until `options.max_frames` is reached
///
/// Opens and initializes the controller, then repeats
/// advance, render, flush and delay. A frame that left every page clean is
/// not flushed, whatever the [`FlushMode`](crate::FlushMode). A terminal
/// state gets its final frame flushed and held for `terminal_hold_ms` before
/// the simulation is reset. The display is closed on every exit path.
///
/// # Errors
///
/// Returns the first open, initialize or flush error. If closing also fails
/// after such an error, the close failure is logged and the first error
/// is returned.
pub fn run<I, B, S, D>(
    display: &mut Display<I, B>,
    simulation: &mut S,
    delay: &mut D,
    options: RunOptions,
) -> Result<RunSummary, Error<I>>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
    S: Simulation,
    D: DelayNs,
{
    match drive(display, simulation, delay, options) {
        Ok(summary) => {
            display.close()?;
            log::info!(
                "run finished after {} frames, {} rounds",
                summary.frames,
                summary.rounds
            );
            Ok(summary)
        }
        Err(err) => {
            if let Err(close_err) = display.close() {
                log::warn!("close after failed run also failed: {}", close_err);
            }
            Err(err)
        }
    }
}

fn drive<I, B, S, D>(
    display: &mut Display<I, B>,
    simulation: &mut S,
    delay: &mut D,
    options: RunOptions,
) -> Result<RunSummary, Error<I>>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
    S: Simulation,
    D: DelayNs,
{
    display.open()?;
    display.initialize()?;

    let mut summary = RunSummary::default();
    while options.max_frames.is_none_or(|max| summary.frames < max) {
        step(display, simulation, delay, options, &mut summary)?;
    }
    Ok(summary)
}

/// One frame: advance, render, flush if anything changed, then pause
fn step<I, B, S, D>(
    display: &mut Display<I, B>,
    simulation: &mut S,
    delay: &mut D,
    options: RunOptions,
    summary: &mut RunSummary,
) -> Result<(), Error<I>>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
    S: Simulation,
    D: DelayNs,
{
    let dt = Duration::from_millis(u64::from(options.frame_delay_ms));
    let terminal = simulation.advance(dt);
    simulation.render(display.frame_mut());
    if display.frame().dirty_pages() != 0 {
        display.flush()?;
    }
    summary.frames = summary.frames.saturating_add(1);

    if terminal {
        summary.rounds = summary.rounds.saturating_add(1);
        log::debug!("round {} over at frame {}", summary.rounds, summary.frames);
        delay.delay_ms(options.terminal_hold_ms);
        simulation.reset();
    } else {
        delay.delay_ms(options.frame_delay_ms);
    }
    Ok(())
}
