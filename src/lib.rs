//! SSD1306 OLED Framebuffer and Driver
//!
//! A page-addressed framebuffer, controller driver and small frame-stepped
//! simulations for SSD1306 monochrome OLED panels up to 128x64 pixels.
//!
//! ## Features
//!
//! - `no_std` compatible, no allocation required
//! - `embedded-hal` v1.0 I2C support, plus raw-frame USB bridges
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Bresenham lines, filled circles and a 5x8 bitmap font
//! - Per-page dirty tracking for bandwidth-saving flushes
//! - Bouncing ball, Life, Pong, Space Invaders, a rotating cube and a clock
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::i2c::{I2c, Operation};
//! use ssd1306_sim::sim::{Life, LifeConfig};
//! use ssd1306_sim::{Builder, FlushMode, Display, I2cInterface, RunOptions, run};
//!
//! # struct MockI2c;
//! # impl embedded_hal::i2c::ErrorType for MockI2c { type Error = Infallible; }
//! # impl I2c for MockI2c {
//! #     fn transaction(
//! #         &mut self,
//! #         _address: u8,
//! #         _operations: &mut [Operation<'_>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockDelay;
//! # impl embedded_hal::delay::DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let i2c = MockI2c;
//! # let mut delay = MockDelay;
//! let config = match Builder::new().flush_mode(FlushMode::DirtyPages).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let interface = match I2cInterface::from_config(i2c, &config) {
//!     Ok(interface) => interface,
//!     Err(_) => return,
//! };
//! let mut display = Display::new(interface, config, [0u8; 1024]);
//! let mut life: Life<64, 32> = Life::new(LifeConfig {
//!     cell_size: 2,
//!     ..LifeConfig::default()
//! });
//!
//! let options = RunOptions {
//!     frame_delay_ms: 100,
//!     ..RunOptions::default()
//! };
//! if let Err(err) = run(&mut display, &mut life, &mut delay, options) {
//!     log::error!("display run failed: {}", err);
//! }
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// SSD1306 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Controller lifecycle and flushing
pub mod display;
/// Error types for the driver
pub mod error;
/// Fixed-width bitmap font
pub mod font;
/// Packed 1-bit framebuffer
pub mod framebuffer;
/// Integer and 3D point types
pub mod geometry;
/// Hardware interface abstraction
pub mod interface;
/// Line, circle, glyph and projection algorithms
pub mod raster;
/// Frame loop
pub mod runner;
/// DHT12 temperature and humidity sensor
pub mod sensor;
/// Frame-stepped simulations
pub mod sim;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use config::{Builder, Config, Dimensions, FlushMode, MAX_BUFFER_SIZE, MAX_HEIGHT, MAX_WIDTH};
pub use display::{Display, State};
pub use error::{BuilderError, Error};
pub use framebuffer::FrameBuffer;
pub use geometry::{Point, Point3};
pub use interface::{ByteStream, DisplayInterface, I2cInterface, InterfaceError, StreamInterface};
pub use runner::{RunOptions, RunSummary, run};
pub use sim::Simulation;
