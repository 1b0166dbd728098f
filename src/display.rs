//! Controller lifecycle and page flushing
//!
//! [`Display`] owns the transport and the [`FrameBuffer`] and walks the
//! controller through a fixed sequence of states:
//!
//! ```text
//! Closed --open--> Opening --initialize--> Initialized --flush--> Streaming
//!    ^                                                                |
//!    +------------------------------ close ---------------------------+
//! ```
//!
//! Drawing goes to the framebuffer at any time; nothing reaches the panel
//! until [`Display::flush`]. A flush writes each page as three commands
//! (page select, column low nibble, column high nibble) followed by one
//! data transfer of `width` bytes.
//!
//! ## Example
//!
//! ```
//! use ssd1306_sim::{Config, Display, DisplayInterface};
//! # #[derive(Debug, Default)]
//! # struct Recorder { commands: Vec<u8>, frames: usize }
//! # impl DisplayInterface for Recorder {
//! #     type Error = core::convert::Infallible;
//! #     fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
//! #         self.commands.push(command);
//! #         Ok(())
//! #     }
//! #     fn send_data(&mut self, _data: &[u8]) -> Result<(), Self::Error> {
//! #         self.frames += 1;
//! #         Ok(())
//! #     }
//! # }
//! let mut display = Display::new(Recorder::default(), Config::default(), [0u8; 1024]);
//!
//! if display.open().is_err() || display.initialize().is_err() {
//!     return;
//! }
//! display.frame_mut().draw_circle(64, 32, 5, true);
//! let pages = display.flush().unwrap_or(0);
//! assert_eq!(pages, 8);
//!
//! let _ = display.close();
//! ```

use crate::command::{
    DISPLAY_OFF, DISPLAY_ON, INVERT_DISPLAY, NORMAL_DISPLAY, SET_CONTRAST, SET_HIGH_COLUMN,
    SET_LOW_COLUMN, init_sequence, set_page_start,
};
use crate::config::{Config, Dimensions, FlushMode};
use crate::error::Error;
use crate::framebuffer::FrameBuffer;
use crate::interface::DisplayInterface;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Controller lifecycle state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum State {
    /// Transport not acquired
    #[default]
    Closed,
    /// Transport acquired, controller not yet configured
    Opening,
    /// Init table sent, nothing flushed yet
    Initialized,
    /// At least one frame has been flushed
    Streaming,
}

impl State {
    /// Whether the controller accepts commands and flushes
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Initialized | Self::Streaming)
    }
}

/// SSD1306 controller with its framebuffer
///
/// ## Type Parameters
///
/// * `I` - Interface type implementing [`DisplayInterface`]
/// * `B` - Framebuffer storage implementing `AsRef<[u8]> + AsMut<[u8]>`
///
/// The transport is closed when the `Display` is dropped while still open,
/// so every exit path releases the bus exactly once.
pub struct Display<I, B>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Pixel storage mirrored to display RAM on flush
    frame: FrameBuffer<B>,
    /// Lifecycle state
    state: State,
}

impl<I, B> Display<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a new Display instance
    ///
    /// # Arguments
    ///
    /// * `interface` - Transport to the controller
    /// * `config` - Display configuration
    /// * `buffer` - Framebuffer storage (at least `dimensions.buffer_size()` bytes)
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is smaller than the configured dimensions require.
    pub fn new(interface: I, config: Config, buffer: B) -> Self {
        let frame = FrameBuffer::new(buffer, config.dimensions);
        Self {
            interface,
            config,
            frame,
            state: State::Closed,
        }
    }

    /// Try to create a new Display, returning an error if the buffer is too small
    ///
    /// This is the fallible version of [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` if `buffer` is smaller than
    /// `dimensions.buffer_size()`.
    pub fn try_new(interface: I, config: Config, buffer: B) -> Result<Self, Error<I>> {
        let required = config.dimensions.buffer_size();
        let provided = buffer.as_ref().len();
        if provided < required {
            return Err(Error::BufferTooSmall { required, provided });
        }
        Ok(Self::new(interface, config, buffer))
    }

    /// Acquire the transport
    ///
    /// Clears the framebuffer so the first frame starts blank.
    ///
    /// # Errors
    ///
    /// Returns `Error::ResourceUnavailable` if the transport cannot be opened,
    /// leaving the controller `Closed`, or `Error::InvalidState` if it is
    /// already open.
    pub fn open(&mut self) -> DisplayResult<I> {
        self.expect_state(State::Closed)?;
        self.interface.open().map_err(Error::ResourceUnavailable)?;
        self.frame.clear();
        self.frame.mark_all_dirty();
        self.state = State::Opening;
        log::info!("display opened");
        Ok(())
    }

    /// Replay the controller initialization table
    ///
    /// One command transfer per table byte, in table order.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` unless the controller was just opened,
    /// or `Error::Transmission` if a command is rejected.
    pub fn initialize(&mut self) -> DisplayResult<I> {
        self.expect_state(State::Opening)?;
        for cmd in init_sequence(self.config.dimensions.height()) {
            self.send_command(cmd)?;
        }
        self.frame.mark_all_dirty();
        self.state = State::Initialized;
        log::debug!(
            "display initialized ({}x{})",
            self.config.dimensions.width(),
            self.config.dimensions.height()
        );
        Ok(())
    }

    /// Push the framebuffer to display RAM
    ///
    /// With [`FlushMode::Full`] every page is sent. With
    /// [`FlushMode::DirtyPages`] only pages changed since the previous flush
    /// are sent. Returns the number of pages written.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` before [`initialize`](Self::initialize),
    /// or `Error::Transmission` if a transfer is rejected. Pages not yet
    /// written stay dirty.
    pub fn flush(&mut self) -> Result<usize, Error<I>> {
        if !self.state.is_ready() {
            return Err(Error::InvalidState {
                expected: State::Initialized,
                actual: self.state,
            });
        }

        let mut sent = 0;
        for page in 0..self.config.dimensions.pages() {
            if self.config.flush_mode == FlushMode::DirtyPages && !self.frame.is_page_dirty(page)
            {
                continue;
            }
            self.send_command(set_page_start(page))?;
            self.send_command(SET_LOW_COLUMN)?;
            self.send_command(SET_HIGH_COLUMN)?;
            if let Some(bytes) = self.frame.page(page) {
                self.interface
                    .send_data(bytes)
                    .map_err(Error::Transmission)?;
            }
            sent += 1;
        }

        self.frame.mark_clean();
        self.state = State::Streaming;
        log::trace!("flushed {} pages", sent);
        Ok(sent)
    }

    /// Blank the framebuffer and push every page
    ///
    /// # Errors
    ///
    /// Same as [`flush`](Self::flush).
    pub fn clear_screen(&mut self) -> DisplayResult<I> {
        self.frame.clear();
        self.frame.mark_all_dirty();
        self.flush().map(|_| ())
    }

    /// Set panel contrast (0x00-0xFF)
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` before initialization, or
    /// `Error::Transmission` if a command is rejected.
    pub fn set_contrast(&mut self, contrast: u8) -> DisplayResult<I> {
        self.expect_ready()?;
        self.send_command(SET_CONTRAST)?;
        self.send_command(contrast)
    }

    /// Swap lit and unlit pixels on the panel without touching display RAM
    pub fn set_inverted(&mut self, inverted: bool) -> DisplayResult<I> {
        self.expect_ready()?;
        self.send_command(if inverted {
            INVERT_DISPLAY
        } else {
            NORMAL_DISPLAY
        })
    }

    /// Switch the panel on or put it to sleep
    pub fn set_display_on(&mut self, on: bool) -> DisplayResult<I> {
        self.expect_ready()?;
        self.send_command(if on { DISPLAY_ON } else { DISPLAY_OFF })
    }

    /// Framebuffer contents
    pub fn frame(&self) -> &FrameBuffer<B> {
        &self.frame
    }

    /// Framebuffer for drawing
    pub fn frame_mut(&mut self) -> &mut FrameBuffer<B> {
        &mut self.frame
    }
}

impl<I, B> Display<I, B>
where
    I: DisplayInterface,
{
    /// Release the transport
    ///
    /// Safe to call in any state and more than once; only the first call
    /// after a successful [`open`](Self::open) reaches the transport. The
    /// controller is `Closed` afterwards even if the release fails.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transmission` if the transport reports a failure while
    /// closing.
    pub fn close(&mut self) -> DisplayResult<I> {
        if self.state == State::Closed {
            return Ok(());
        }
        self.state = State::Closed;
        log::info!("display closed");
        self.interface.close().map_err(Error::Transmission)
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// Get display dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the underlying interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    fn expect_state(&self, expected: State) -> DisplayResult<I> {
        if self.state != expected {
            return Err(Error::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    fn expect_ready(&self) -> DisplayResult<I> {
        if !self.state.is_ready() {
            return Err(Error::InvalidState {
                expected: State::Initialized,
                actual: self.state,
            });
        }
        Ok(())
    }

    /// Send a command to the display controller
    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        self.interface
            .send_command(cmd)
            .map_err(Error::Transmission)
    }
}

impl<I, B> Drop for Display<I, B>
where
    I: DisplayInterface,
{
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            log::warn!("failed to close display on drop: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::INIT_SEQUENCE;
    use crate::config::{Builder, Dimensions};
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::Cell;

    #[derive(Debug, Default)]
    struct MockInterface {
        commands: Vec<u8>,
        data: Vec<Vec<u8>>,
        command_data: Vec<(u8, Vec<u8>)>,
        last_command: Option<u8>,
        fail_open: bool,
        fail_after_commands: Option<usize>,
        closes: Rc<Cell<usize>>,
    }

    impl DisplayInterface for MockInterface {
        type Error = &'static str;

        fn open(&mut self) -> Result<(), Self::Error> {
            if self.fail_open {
                return Err("busy");
            }
            Ok(())
        }

        fn close(&mut self) -> Result<(), Self::Error> {
            self.closes.set(self.closes.get() + 1);
            Ok(())
        }

        fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
            if self.fail_after_commands == Some(self.commands.len()) {
                return Err("nack");
            }
            self.commands.push(command);
            self.last_command = Some(command);
            Ok(())
        }

        fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.data.push(data.to_vec());
            if let Some(cmd) = self.last_command {
                self.command_data.push((cmd, data.to_vec()));
            }
            Ok(())
        }
    }

    fn test_display(interface: MockInterface) -> Display<MockInterface, [u8; 1024]> {
        Display::new(interface, Config::default(), [0u8; 1024])
    }

    fn ready_display(interface: MockInterface) -> Display<MockInterface, [u8; 1024]> {
        let mut display = test_display(interface);
        display.open().unwrap();
        display.initialize().unwrap();
        display
    }

    #[test]
    fn test_initialize_sends_init_table_in_order() {
        let display = ready_display(MockInterface::default());
        assert_eq!(display.interface().commands, INIT_SEQUENCE);
        assert!(display.interface().data.is_empty());
        assert_eq!(display.state(), State::Initialized);
    }

    #[test]
    fn test_flush_frames_each_page() {
        let mut display = ready_display(MockInterface::default());
        display.frame_mut().set_pixel(0, 8, true);
        let before = display.interface().commands.len();

        assert_eq!(display.flush().unwrap(), 8);

        let commands = &display.interface().commands[before..];
        assert_eq!(commands.len(), 24);
        for (page, cmds) in commands.chunks(3).enumerate() {
            assert_eq!(cmds, [0xB0 + page as u8, 0x00, 0x10]);
        }
        let data = &display.interface().data;
        assert_eq!(data.len(), 8);
        assert!(data.iter().all(|d| d.len() == 128));
        assert_eq!(data[1][0], 0x01);
        assert_eq!(display.interface().command_data[1].0, 0x10);
        assert_eq!(display.state(), State::Streaming);
    }

    #[test]
    fn test_full_mode_resends_unchanged_pages() {
        let mut display = ready_display(MockInterface::default());
        assert_eq!(display.flush().unwrap(), 8);
        assert_eq!(display.flush().unwrap(), 8);
    }

    #[test]
    fn test_dirty_mode_sends_changed_pages_only() {
        let config = Builder::new()
            .flush_mode(FlushMode::DirtyPages)
            .build()
            .unwrap();
        let mut display = Display::new(MockInterface::default(), config, [0u8; 1024]);
        display.open().unwrap();
        display.initialize().unwrap();

        assert_eq!(display.flush().unwrap(), 8);
        assert_eq!(display.flush().unwrap(), 0);

        display.frame_mut().set_pixel(10, 40, true);
        let before = display.interface().commands.len();
        assert_eq!(display.flush().unwrap(), 1);
        assert_eq!(display.interface().commands[before], 0xB5);
    }

    #[test]
    fn test_flush_before_initialize_is_invalid_state() {
        let mut display = test_display(MockInterface::default());
        assert!(matches!(
            display.flush(),
            Err(Error::InvalidState {
                expected: State::Initialized,
                actual: State::Closed
            })
        ));
        display.open().unwrap();
        assert!(matches!(
            display.flush(),
            Err(Error::InvalidState {
                actual: State::Opening,
                ..
            })
        ));
    }

    #[test]
    fn test_initialize_requires_open() {
        let mut display = test_display(MockInterface::default());
        assert!(matches!(
            display.initialize(),
            Err(Error::InvalidState {
                expected: State::Opening,
                actual: State::Closed
            })
        ));
    }

    #[test]
    fn test_open_twice_is_invalid_state() {
        let mut display = test_display(MockInterface::default());
        display.open().unwrap();
        assert!(matches!(
            display.open(),
            Err(Error::InvalidState { .. })
        ));
    }

    #[test]
    fn test_open_failure_is_resource_unavailable() {
        let mut display = test_display(MockInterface {
            fail_open: true,
            ..MockInterface::default()
        });
        assert!(matches!(
            display.open(),
            Err(Error::ResourceUnavailable("busy"))
        ));
        assert_eq!(display.state(), State::Closed);
    }

    #[test]
    fn test_transmission_failure_surfaces() {
        let mut display = test_display(MockInterface {
            fail_after_commands: Some(3),
            ..MockInterface::default()
        });
        display.open().unwrap();
        assert!(matches!(
            display.initialize(),
            Err(Error::Transmission("nack"))
        ));
        assert_eq!(display.interface().commands.len(), 3);
        assert_eq!(display.state(), State::Opening);
    }

    #[test]
    fn test_close_is_idempotent_and_drop_does_not_reclose() {
        let closes = Rc::new(Cell::new(0));
        {
            let mut display = ready_display(MockInterface {
                closes: Rc::clone(&closes),
                ..MockInterface::default()
            });
            display.close().unwrap();
            display.close().unwrap();
            assert_eq!(display.state(), State::Closed);
        }
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_drop_closes_open_display() {
        let closes = Rc::new(Cell::new(0));
        {
            let _display = ready_display(MockInterface {
                closes: Rc::clone(&closes),
                ..MockInterface::default()
            });
        }
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_never_opened_display_is_not_closed() {
        let closes = Rc::new(Cell::new(0));
        drop(test_display(MockInterface {
            closes: Rc::clone(&closes),
            ..MockInterface::default()
        }));
        assert_eq!(closes.get(), 0);
    }

    #[test]
    fn test_contrast_invert_and_power_commands() {
        let mut display = ready_display(MockInterface::default());
        let before = display.interface().commands.len();
        display.set_contrast(0x42).unwrap();
        display.set_inverted(true).unwrap();
        display.set_inverted(false).unwrap();
        display.set_display_on(false).unwrap();
        assert_eq!(
            display.interface().commands[before..],
            [0x81, 0x42, 0xA7, 0xA6, 0xAE]
        );
    }

    #[test]
    fn test_settings_require_initialization() {
        let mut display = test_display(MockInterface::default());
        assert!(matches!(
            display.set_contrast(1),
            Err(Error::InvalidState { .. })
        ));
    }

    #[test]
    fn test_clear_screen_pushes_blank_pages() {
        let config = Builder::new()
            .flush_mode(FlushMode::DirtyPages)
            .build()
            .unwrap();
        let mut display = Display::new(MockInterface::default(), config, [0u8; 1024]);
        display.open().unwrap();
        display.initialize().unwrap();
        display.flush().unwrap();

        display.clear_screen().unwrap();
        let data = &display.interface().data;
        assert_eq!(data.len(), 16);
        assert!(data[8..].iter().all(|d| d.iter().all(|&b| b == 0)));
    }

    #[test]
    fn test_open_clears_previous_frame() {
        let mut display = test_display(MockInterface::default());
        display.frame_mut().fill_rect(0, 0, 10, 10, true);
        display.open().unwrap();
        assert!(display.frame().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_half_height_panel_flushes_four_pages() {
        let config = Builder::new()
            .dimensions(Dimensions::new(128, 32).unwrap())
            .build()
            .unwrap();
        let mut display = Display::new(MockInterface::default(), config, [0u8; 512]);
        display.open().unwrap();
        display.initialize().unwrap();
        assert_eq!(display.flush().unwrap(), 4);
    }

    #[test]
    fn test_try_new_small_buffer_returns_error() {
        let result = Display::try_new(MockInterface::default(), Config::default(), [0u8; 512]);
        assert!(matches!(
            result,
            Err(Error::BufferTooSmall {
                required: 1024,
                provided: 512
            })
        ));
    }

    #[test]
    #[should_panic(expected = "buffer too small")]
    fn test_new_panics_on_small_buffer() {
        let _ = Display::new(MockInterface::default(), Config::default(), [0u8; 512]);
    }
}
