//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and two implementations
//! for talking to the SSD1306 controller:
//!
//! - [`I2cInterface`]: any `embedded-hal` v1.0 [`I2c`] bus. The HAL emits the
//!   address byte itself, so frames carry only the control byte and payload.
//! - [`StreamInterface`]: bridges (USB-to-I2C adapters and similar) that take
//!   a raw byte stream including the address byte, through the [`ByteStream`]
//!   trait.
//!
//! ## Framing
//!
//! | Transfer | Frame                                   |
//! |----------|-----------------------------------------|
//! | Command  | `[addr << 1, 0x00, command]`            |
//! | Data     | `[addr << 1, 0x40, data...]`            |
//!
//! ## Example
//!
//! ```
//! use ssd1306_sim::interface::{ByteStream, DisplayInterface, StreamInterface};
//!
//! #[derive(Default)]
//! struct Recorder {
//!     frames: Vec<Vec<u8>>,
//! }
//!
//! impl ByteStream for Recorder {
//!     type Error = core::convert::Infallible;
//!
//!     fn write_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
//!         self.frames.push(frame.to_vec());
//!         Ok(())
//!     }
//! }
//!
//! let mut interface = match StreamInterface::new(Recorder::default(), 0x3C) {
//!     Ok(interface) => interface,
//!     Err(_) => return,
//! };
//! let _ = interface.send_command(0xAF);
//! let _ = interface.send_data(&[0xFF, 0x00]);
//!
//! let frames = &interface.stream().frames;
//! assert_eq!(frames[0], [0x78, 0x00, 0xAF]);
//! assert_eq!(frames[1], [0x78, 0x40, 0xFF, 0x00]);
//! ```

use core::fmt::Debug;
use embedded_hal::i2c::I2c;

use crate::command::{CONTROL_COMMAND, CONTROL_DATA, DEFAULT_ADDRESS};
use crate::config::{Config, MAX_WIDTH, check_address};
use crate::error::BuilderError;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Largest data payload carried by a single frame
///
/// One full page row. Longer payloads are split across frames.
pub const MAX_DATA_CHUNK: usize = MAX_WIDTH as usize;

/// Trait for hardware interface to the SSD1306 controller
///
/// This trait abstracts over different bus implementations, allowing the
/// [`Display`](crate::display::Display) to work with anything that can
/// deliver command and data transfers.
///
/// ## Implementing
///
/// For most cases, use [`I2cInterface`] or [`StreamInterface`]. Implement
/// this trait directly for buses that need custom framing.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Acquire the underlying bus or device
    ///
    /// Called once by [`Display::open`](crate::Display::open). Buses that are
    /// already usable when constructed can rely on the default no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is busy or absent.
    fn open(&mut self) -> InterfaceResult<(), Self::Error> {
        Ok(())
    }

    /// Release the underlying bus or device
    ///
    /// Must be safe to call after a failed transfer.
    fn close(&mut self) -> InterfaceResult<(), Self::Error> {
        Ok(())
    }

    /// Send a command byte to the controller
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer is rejected.
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send display RAM data bytes to the controller
    ///
    /// # Arguments
    ///
    /// * `data` - Slice of bytes to send
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer is rejected.
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
#[derive(Debug)]
pub enum InterfaceError<BusErr> {
    /// Bus transfer or device error
    Bus(BusErr),
}

impl<BusErr: Debug> core::fmt::Display for InterfaceError<BusErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "Bus error: {e:?}"),
        }
    }
}

impl<BusErr: Debug> core::error::Error for InterfaceError<BusErr> {}

/// SSD1306 interface over an `embedded-hal` I2C bus
///
/// ## Example
///
/// ```
/// use embedded_hal::i2c::{ErrorType, I2c, Operation};
/// use ssd1306_sim::{Display, I2cInterface};
/// # use core::convert::Infallible;
/// # struct MockI2c;
/// # impl ErrorType for MockI2c { type Error = Infallible; }
/// # impl I2c for MockI2c {
/// #     fn transaction(
/// #         &mut self,
/// #         _address: u8,
/// #         _operations: &mut [Operation<'_>],
/// #     ) -> Result<(), Self::Error> {
/// #         Ok(())
/// #     }
/// # }
/// let interface = I2cInterface::new(MockI2c);
/// let display = Display::new(interface, Default::default(), [0u8; 1024]);
/// assert_eq!(display.frame().dimensions().width(), 128);
/// ```
#[derive(Debug)]
pub struct I2cInterface<I2C> {
    /// I2C bus
    i2c: I2C,
    /// 7-bit device address
    address: u8,
}

impl<I2C: I2c> I2cInterface<I2C> {
    /// Create a new interface at the default address (0x3C)
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DEFAULT_ADDRESS,
        }
    }

    /// Create a new interface at a specific 7-bit address
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidAddress` if `address` is above `0x7F`.
    pub fn with_address(i2c: I2C, address: u8) -> Result<Self, BuilderError> {
        Ok(Self {
            i2c,
            address: check_address(address)?,
        })
    }

    /// Create a new interface at `config.address`
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidAddress` if the address is above `0x7F`.
    pub fn from_config(i2c: I2C, config: &Config) -> Result<Self, BuilderError> {
        Self::with_address(i2c, config.address)
    }

    /// Get the 7-bit device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Check whether a device acknowledges at the configured address
    ///
    /// Returns a plain status rather than an error: a missing device is an
    /// expected answer here.
    pub fn probe(&mut self) -> bool {
        self.i2c.write(self.address, &[]).is_ok()
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> DisplayInterface for I2cInterface<I2C> {
    type Error = InterfaceError<I2C::Error>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.i2c
            .write(self.address, &[CONTROL_COMMAND, command])
            .map_err(InterfaceError::Bus)
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        let mut frame = [0u8; MAX_DATA_CHUNK + 1];
        frame[0] = CONTROL_DATA;
        for chunk in data.chunks(MAX_DATA_CHUNK) {
            frame[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c
                .write(self.address, &frame[..=chunk.len()])
                .map_err(InterfaceError::Bus)?;
        }
        Ok(())
    }
}

/// Raw byte-stream bus, such as a USB-to-I2C bridge
///
/// Frames passed to [`write_frame`](ByteStream::write_frame) already contain
/// the shifted address byte; the implementation transmits them as-is and
/// reports whether the device acknowledged.
pub trait ByteStream {
    /// Error type for stream operations
    type Error: Debug;

    /// Acquire the bridge device
    fn open(&mut self) -> InterfaceResult<(), Self::Error> {
        Ok(())
    }

    /// Release the bridge device
    fn close(&mut self) -> InterfaceResult<(), Self::Error> {
        Ok(())
    }

    /// Transmit one complete frame
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer was not acknowledged.
    fn write_frame(&mut self, frame: &[u8]) -> InterfaceResult<(), Self::Error>;
}

/// SSD1306 interface over a raw [`ByteStream`]
#[derive(Debug)]
pub struct StreamInterface<S> {
    /// Underlying stream
    stream: S,
    /// 7-bit device address
    address: u8,
}

impl<S: ByteStream> StreamInterface<S> {
    /// Create a new interface for the device at `address` (7-bit)
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidAddress` if `address` is above `0x7F`.
    pub fn new(stream: S, address: u8) -> Result<Self, BuilderError> {
        Ok(Self {
            stream,
            address: check_address(address)?,
        })
    }

    /// Create a new interface for the device at `config.address`
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidAddress` if the address is above `0x7F`.
    pub fn from_config(stream: S, config: &Config) -> Result<Self, BuilderError> {
        Self::new(stream, config.address)
    }

    /// Address byte with the write flag clear
    fn address_byte(&self) -> u8 {
        self.address << 1
    }

    /// Access the underlying stream
    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Release the underlying stream
    pub fn release(self) -> S {
        self.stream
    }
}

impl<S: ByteStream> DisplayInterface for StreamInterface<S> {
    type Error = InterfaceError<S::Error>;

    fn open(&mut self) -> InterfaceResult<(), Self::Error> {
        self.stream.open().map_err(InterfaceError::Bus)
    }

    fn close(&mut self) -> InterfaceResult<(), Self::Error> {
        self.stream.close().map_err(InterfaceError::Bus)
    }

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        let frame = [self.address_byte(), CONTROL_COMMAND, command];
        self.stream.write_frame(&frame).map_err(InterfaceError::Bus)
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        let mut frame = [0u8; MAX_DATA_CHUNK + 2];
        frame[0] = self.address_byte();
        frame[1] = CONTROL_DATA;
        for chunk in data.chunks(MAX_DATA_CHUNK) {
            frame[2..2 + chunk.len()].copy_from_slice(chunk);
            self.stream
                .write_frame(&frame[..2 + chunk.len()])
                .map_err(InterfaceError::Bus)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct MockError;

    impl embedded_hal::i2c::Error for MockError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    #[derive(Default)]
    struct MockI2c {
        writes: Vec<(u8, Vec<u8>)>,
        nack: bool,
    }

    impl ErrorType for MockI2c {
        type Error = MockError;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.nack {
                return Err(MockError);
            }
            for op in operations.iter() {
                if let Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockStream {
        frames: Vec<Vec<u8>>,
        opened: bool,
        closed: bool,
    }

    impl ByteStream for MockStream {
        type Error = MockError;

        fn open(&mut self) -> Result<(), Self::Error> {
            self.opened = true;
            Ok(())
        }

        fn close(&mut self) -> Result<(), Self::Error> {
            self.closed = true;
            Ok(())
        }

        fn write_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
            self.frames.push(frame.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_i2c_command_frame() {
        let mut interface = I2cInterface::new(MockI2c::default());
        interface.send_command(0xAE).unwrap();
        let i2c = interface.release();
        assert_eq!(i2c.writes, [(0x3C, alloc::vec![0x00, 0xAE])]);
    }

    #[test]
    fn test_i2c_data_frame_prefixes_control_byte() {
        let mut interface = I2cInterface::with_address(MockI2c::default(), 0x3D).unwrap();
        interface.send_data(&[1, 2, 3]).unwrap();
        let i2c = interface.release();
        assert_eq!(i2c.writes, [(0x3D, alloc::vec![0x40, 1, 2, 3])]);
    }

    #[test]
    fn test_i2c_long_data_is_chunked() {
        let mut interface = I2cInterface::new(MockI2c::default());
        let data = [0xAAu8; MAX_DATA_CHUNK + 10];
        interface.send_data(&data).unwrap();
        let i2c = interface.release();
        assert_eq!(i2c.writes.len(), 2);
        assert_eq!(i2c.writes[0].1.len(), MAX_DATA_CHUNK + 1);
        assert_eq!(i2c.writes[1].1.len(), 11);
        assert!(i2c.writes.iter().all(|(_, frame)| frame[0] == CONTROL_DATA));
    }

    #[test]
    fn test_i2c_nack_is_error_and_probe_is_false() {
        let mut interface = I2cInterface::new(MockI2c {
            nack: true,
            ..MockI2c::default()
        });
        assert!(matches!(
            interface.send_command(0xAF),
            Err(InterfaceError::Bus(MockError))
        ));
        assert!(!interface.probe());
    }

    #[test]
    fn test_i2c_probe_acknowledged() {
        let mut interface = I2cInterface::new(MockI2c::default());
        assert!(interface.probe());
    }

    #[test]
    fn test_stream_frames_carry_shifted_address() {
        let mut interface = StreamInterface::new(MockStream::default(), 0x3C).unwrap();
        interface.send_command(0xB0).unwrap();
        interface.send_data(&[0x0F; 4]).unwrap();
        let stream = interface.release();
        assert_eq!(stream.frames[0], [0x78, 0x00, 0xB0]);
        assert_eq!(stream.frames[1], [0x78, 0x40, 0x0F, 0x0F, 0x0F, 0x0F]);
    }

    #[test]
    fn test_eight_bit_addresses_rejected() {
        assert!(matches!(
            StreamInterface::new(MockStream::default(), 0xBC),
            Err(BuilderError::InvalidAddress(0xBC))
        ));
        assert!(matches!(
            I2cInterface::with_address(MockI2c::default(), 0x80),
            Err(BuilderError::InvalidAddress(0x80))
        ));
    }

    #[test]
    fn test_interfaces_use_configured_address() {
        let config = crate::config::Builder::new().address(0x3D).build().unwrap();

        let mut stream = StreamInterface::from_config(MockStream::default(), &config).unwrap();
        stream.send_command(0xAF).unwrap();
        assert_eq!(stream.release().frames[0], [0x7A, 0x00, 0xAF]);

        let mut i2c = I2cInterface::from_config(MockI2c::default(), &config).unwrap();
        assert_eq!(i2c.address(), 0x3D);
        i2c.send_command(0xAF).unwrap();
        assert_eq!(i2c.release().writes, [(0x3D, alloc::vec![0x00, 0xAF])]);

        let mut tampered = config;
        tampered.address = 0xBC;
        assert!(StreamInterface::from_config(MockStream::default(), &tampered).is_err());
    }

    #[test]
    fn test_stream_open_close_forwarded() {
        let mut interface = StreamInterface::new(MockStream::default(), 0x3C).unwrap();
        interface.open().unwrap();
        interface.close().unwrap();
        let stream = interface.release();
        assert!(stream.opened);
        assert!(stream.closed);
    }
}
