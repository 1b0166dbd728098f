//! Display configuration types and builder

use crate::command::DEFAULT_ADDRESS;
pub use crate::error::{BuilderError, MAX_HEIGHT, MAX_WIDTH};

/// Largest framebuffer the controller can address, in bytes
pub const MAX_BUFFER_SIZE: usize = MAX_WIDTH as usize * (MAX_HEIGHT as usize / 8);

/// Display dimensions
///
/// Only constructed through [`Dimensions::new`] (or `Default`), so every
/// value fits the controller: at most 128 columns and 8 pages.
///
/// ```compile_fail
/// use ssd1306_sim::Dimensions;
///
/// let tall = Dimensions { width: 16, height: 128 };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Number of columns (width in pixels, corresponds to segment outputs)
    width: u16,
    /// Number of rows (height in pixels, corresponds to COM outputs)
    height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - width == 0 or width > MAX_WIDTH
    /// - height < 8 or height > MAX_HEIGHT
    /// - height % 8 != 0 (rows are packed into 8-row pages)
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_WIDTH {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        if height == 0 || height > MAX_HEIGHT || height % 8 != 0 {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in pixels
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels, a multiple of 8
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of 8-row pages
    pub fn pages(&self) -> u8 {
        (self.height / 8) as u8
    }

    /// Calculate required buffer size in bytes
    pub fn buffer_size(&self) -> usize {
        self.width as usize * self.pages() as usize
    }
}

impl Default for Dimensions {
    /// 128x64, the most common SSD1306 module
    fn default() -> Self {
        Self {
            width: MAX_WIDTH,
            height: MAX_HEIGHT,
        }
    }
}

/// How [`Display::flush`](crate::Display::flush) chooses pages to send
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlushMode {
    /// Send every page on every flush
    #[default]
    Full,
    /// Send only pages whose bytes changed since the last flush
    ///
    /// Saves bus bandwidth; the picture on the panel is the same.
    DirtyPages,
}

/// Display configuration
///
/// Use `Builder` to create a Config.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Display dimensions
    pub dimensions: Dimensions,
    /// 7-bit bus address, used by `I2cInterface::from_config` and
    /// `StreamInterface::from_config`
    pub address: u8,
    /// Page selection policy for flushes
    pub flush_mode: FlushMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::default(),
            address: DEFAULT_ADDRESS,
            flush_mode: FlushMode::Full,
        }
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```
/// use ssd1306_sim::{Builder, Dimensions, FlushMode};
///
/// let dims = match Dimensions::new(128, 32) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new()
///     .dimensions(dims)
///     .flush_mode(FlushMode::DirtyPages)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.dimensions.pages(), 4);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a new Builder with default values (128x64 at 0x3C)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.config.dimensions = dims;
        self
    }

    /// Set the 7-bit bus address
    pub fn address(mut self, address: u8) -> Self {
        self.config.address = address;
        self
    }

    /// Set the flush policy
    pub fn flush_mode(mut self, mode: FlushMode) -> Self {
        self.config.flush_mode = mode;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidAddress` if the address does not fit in 7 bits
    pub fn build(self) -> Result<Config, BuilderError> {
        check_address(self.config.address)?;
        Ok(self.config)
    }
}

/// Accept `address` only if it fits in 7 bits
///
/// # Errors
///
/// Returns `BuilderError::InvalidAddress` for values above `0x7F`, whose top
/// bit would be lost when shifted into the address byte.
pub const fn check_address(address: u8) -> Result<u8, BuilderError> {
    if address > 0x7F {
        return Err(BuilderError::InvalidAddress(address));
    }
    Ok(address)
}
