//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and controller operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration or buffer construction
//! - [`Error`] - Runtime errors during controller operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level bus errors
//!
//! Drawing outside the framebuffer is never an error: such writes are dropped.
//! A sensor reading with a bad checksum is reported as "no reading" rather
//! than as an error.
//!
//! ## Example
//!
//! ```
//! use ssd1306_sim::{BuilderError, Dimensions};
//!
//! // Height must be a multiple of 8
//! let result = Dimensions::new(128, 60);
//! assert!(matches!(result, Err(BuilderError::InvalidDimensions { .. })));
//!
//! // Too wide for the controller
//! assert!(Dimensions::new(256, 64).is_err());
//! ```

use crate::display::State;
use crate::interface::DisplayInterface;

/// Maximum number of columns (segment outputs) driven by the SSD1306
pub const MAX_WIDTH: u16 = 128;

/// Maximum number of rows (COM outputs) driven by the SSD1306
pub const MAX_HEIGHT: u16 = 64;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
/// Every variant except [`Error::InvalidState`] and [`Error::BufferTooSmall`]
/// is fatal to the current run: the caller is expected to close the
/// controller and stop.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// The bus or device could not be acquired
    ///
    /// Raised by [`Display::open`](crate::Display::open). There is no retry:
    /// the controller cannot proceed without the bus.
    ResourceUnavailable(I::Error),
    /// A command or data transfer was rejected
    ///
    /// Wraps the underlying error from the [`DisplayInterface`] implementation.
    Transmission(I::Error),
    /// Operation called in the wrong controller state
    InvalidState {
        /// State the operation requires
        expected: State,
        /// State the controller was in
        actual: State,
    },
    /// Buffer is too small for the display
    ///
    /// The provided buffer must be at least `dimensions.buffer_size()` bytes.
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ResourceUnavailable(e) => write!(f, "Bus unavailable: {e:?}"),
            Self::Transmission(e) => write!(f, "Transmission failed: {e:?}"),
            Self::InvalidState { expected, actual } => {
                write!(f, "Invalid controller state: expected {expected:?}, was {actual:?}")
            }
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Buffer too small: required {required} bytes, provided {provided}"
                )
            }
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur before the display is created.
#[derive(Debug, PartialEq)]
pub enum BuilderError {
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width in pixels requested
        width: u16,
        /// Height in pixels requested
        height: u16,
    },
    /// Bus address does not fit in 7 bits
    InvalidAddress(u8),
    /// Buffer is too small for the requested dimensions
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (max {MAX_WIDTH}x{MAX_HEIGHT}, height must be multiple of 8)"
            ),
            Self::InvalidAddress(address) => {
                write!(f, "Invalid bus address 0x{address:02X} (must be 7-bit)")
            }
            Self::BufferTooSmall { required, provided } => write!(
                f,
                "Buffer too small: required {required} bytes, provided {provided}"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
