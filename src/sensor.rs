//! DHT12 temperature and humidity sensor
//!
//! The sensor shares the bus with the display. One read transfers five
//! bytes starting at register `0x00`: humidity integer and tenths,
//! temperature integer and tenths, then a checksum.
//!
//! ```
//! use ssd1306_sim::sensor::Reading;
//!
//! let reading = Reading::from_frame([55, 2, 23, 4, 84]);
//! assert_eq!(reading.map(|r| r.temperature_tenths()), Some(234));
//!
//! // Checksum mismatch means no reading at all
//! assert_eq!(Reading::from_frame([55, 2, 23, 4, 85]), None);
//! ```

use embedded_hal::i2c::I2c;

/// 7-bit bus address of the DHT12
pub const DHT12_ADDRESS: u8 = 0x5C;

/// First data register
const DATA_REGISTER: u8 = 0x00;

/// Sign flag in the temperature tenths byte
const NEGATIVE: u8 = 0x80;

/// One checksum-verified sample
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reading {
    /// Relative humidity, whole percent
    pub humidity_int: u8,
    /// Relative humidity, tenths of a percent
    pub humidity_dec: u8,
    /// Temperature, whole degrees Celsius
    pub temperature_int: u8,
    /// Temperature tenths; bit 7 marks a value below zero
    pub temperature_dec: u8,
}

impl Reading {
    /// Validate a raw `[h_int, h_dec, t_int, t_dec, sum]` frame
    ///
    /// Accepted only if `sum` equals the low byte of the sum of the first
    /// four bytes.
    pub fn from_frame(frame: [u8; 5]) -> Option<Self> {
        let [h_int, h_dec, t_int, t_dec, sum] = frame;
        let expected = h_int
            .wrapping_add(h_dec)
            .wrapping_add(t_int)
            .wrapping_add(t_dec);
        if expected != sum {
            log::debug!("dht12: checksum {:#04x}, expected {:#04x}", sum, expected);
            return None;
        }
        Some(Self {
            humidity_int: h_int,
            humidity_dec: h_dec,
            temperature_int: t_int,
            temperature_dec: t_dec,
        })
    }

    /// Relative humidity in tenths of a percent
    pub fn humidity_tenths(&self) -> u16 {
        u16::from(self.humidity_int) * 10 + u16::from(self.humidity_dec)
    }

    /// Temperature in tenths of a degree Celsius
    pub fn temperature_tenths(&self) -> i16 {
        let magnitude =
            i16::from(self.temperature_int) * 10 + i16::from(self.temperature_dec & !NEGATIVE);
        if self.temperature_dec & NEGATIVE != 0 {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl core::fmt::Display for Reading {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let t = self.temperature_tenths();
        let sign = if t < 0 { "-" } else { "" };
        write!(
            f,
            "{}.{} %RH {}{}.{} C",
            self.humidity_int,
            self.humidity_dec,
            sign,
            t.unsigned_abs() / 10,
            t.unsigned_abs() % 10
        )
    }
}

/// Read one sample from a DHT12 at [`DHT12_ADDRESS`]
///
/// Bus errors and checksum mismatches both yield `None`; the caller
/// decides whether to retry.
pub fn read_dht12<I2C: I2c>(i2c: &mut I2C) -> Option<Reading> {
    let mut frame = [0u8; 5];
    if let Err(err) = i2c.write_read(DHT12_ADDRESS, &[DATA_REGISTER], &mut frame) {
        log::debug!("dht12: read failed: {:?}", err);
        return None;
    }
    Reading::from_frame(frame)
}
