//! SSD1306 command definitions
//!
//! This module defines the command bytes used to drive the SSD1306 OLED
//! controller and the fixed initialization table replayed at start-up.
//!
//! ## Framing
//!
//! Every transfer starts with a control byte that tells the controller how to
//! interpret the bytes that follow:
//!
//! - [`CONTROL_COMMAND`] (0x00): the following bytes are commands
//! - [`CONTROL_DATA`] (0x40): the following bytes are display RAM data
//!
//! Two-byte commands (opcode + operand) are sent as two consecutive command
//! transfers and must never be reordered.
//!
//! ## Example
//!
//! ```
//! use ssd1306_sim::command;
//!
//! assert_eq!(command::INIT_SEQUENCE.len(), 25);
//! assert_eq!(command::INIT_SEQUENCE[0], command::DISPLAY_OFF);
//! assert_eq!(command::set_page_start(3), 0xB3);
//! ```

/// Default 7-bit bus address of SSD1306 modules (0x3C)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Control byte announcing a command stream (0x00)
pub const CONTROL_COMMAND: u8 = 0x00;

/// Control byte announcing a display RAM data stream (0x40)
pub const CONTROL_DATA: u8 = 0x40;

// Fundamental commands

/// Set contrast control (0x81)
///
/// Requires 1 operand byte: contrast level 0x00-0xFF.
pub const SET_CONTRAST: u8 = 0x81;

/// Resume to RAM content display (0xA4)
///
/// Output follows display RAM content.
pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;

/// Entire display on, ignoring RAM content (0xA5)
pub const DISPLAY_ALL_ON: u8 = 0xA5;

/// Normal (non-inverted) display (0xA6)
///
/// RAM bit 1 lights the pixel.
pub const NORMAL_DISPLAY: u8 = 0xA6;

/// Inverted display (0xA7)
///
/// RAM bit 0 lights the pixel.
pub const INVERT_DISPLAY: u8 = 0xA7;

/// Display off, sleep mode (0xAE)
pub const DISPLAY_OFF: u8 = 0xAE;

/// Display on, normal mode (0xAF)
pub const DISPLAY_ON: u8 = 0xAF;

// Addressing commands

/// Set memory addressing mode (0x20)
///
/// Requires 1 operand byte: 0x00 horizontal, 0x01 vertical, 0x02 page.
pub const MEMORY_MODE: u8 = 0x20;

/// Horizontal addressing mode operand for [`MEMORY_MODE`]
pub const MEMORY_MODE_HORIZONTAL: u8 = 0x00;

/// Set lower nibble of the column start address (0x00-0x0F)
pub const SET_LOW_COLUMN: u8 = 0x00;

/// Set higher nibble of the column start address (0x10-0x1F)
pub const SET_HIGH_COLUMN: u8 = 0x10;

/// Set page start address for page addressing mode (0xB0-0xB7)
pub const SET_PAGE_START: u8 = 0xB0;

// Hardware configuration commands

/// Set display start line (0x40-0x7F)
pub const SET_START_LINE: u8 = 0x40;

/// Segment re-map: column 127 mapped to SEG0 (0xA1)
pub const SEGMENT_REMAP: u8 = 0xA1;

/// Set multiplex ratio (0xA8)
///
/// Requires 1 operand byte: number of rows minus one.
pub const SET_MULTIPLEX: u8 = 0xA8;

/// COM output scan direction: remapped, COM[N-1] to COM0 (0xC8)
pub const COM_SCAN_DEC: u8 = 0xC8;

/// Set display offset (0xD3)
///
/// Requires 1 operand byte: vertical shift by COM.
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;

/// Set COM pins hardware configuration (0xDA)
///
/// Requires 1 operand byte.
pub const SET_COM_PINS: u8 = 0xDA;

// Timing and driving commands

/// Set display clock divide ratio / oscillator frequency (0xD5)
///
/// Requires 1 operand byte.
pub const SET_CLOCK_DIV: u8 = 0xD5;

/// Set pre-charge period (0xD9)
///
/// Requires 1 operand byte.
pub const SET_PRECHARGE: u8 = 0xD9;

/// Set VCOMH deselect level (0xDB)
///
/// Requires 1 operand byte.
pub const SET_VCOMH: u8 = 0xDB;

/// Charge pump setting (0x8D)
///
/// Requires 1 operand byte: 0x14 enables the internal pump.
pub const CHARGE_PUMP: u8 = 0x8D;

/// Controller initialization table
///
/// Opcodes and their operands in the exact order the controller expects.
/// Replayed verbatim, one command transfer per byte.
pub const INIT_SEQUENCE: [u8; 25] = [
    DISPLAY_OFF,
    SET_CLOCK_DIV,
    0x80,
    SET_MULTIPLEX,
    0x3F,
    SET_DISPLAY_OFFSET,
    0x00,
    SET_START_LINE,
    CHARGE_PUMP,
    0x14,
    MEMORY_MODE,
    MEMORY_MODE_HORIZONTAL,
    SEGMENT_REMAP,
    COM_SCAN_DEC,
    SET_COM_PINS,
    0x12,
    SET_CONTRAST,
    0xCF,
    SET_PRECHARGE,
    0xF1,
    SET_VCOMH,
    0x40,
    DISPLAY_ALL_ON_RESUME,
    NORMAL_DISPLAY,
    DISPLAY_ON,
];

/// Initialization table for a panel `height` rows tall
///
/// Identical to [`INIT_SEQUENCE`] for 64-row panels. Shorter panels get
/// their multiplex ratio set to `height - 1`, and panels of 32 rows or fewer
/// use sequential COM pin wiring (`0x02`).
pub const fn init_sequence(height: u16) -> [u8; 25] {
    let mut seq = INIT_SEQUENCE;
    if height >= 8 && height < 64 {
        seq[4] = (height - 1) as u8;
        if height <= 32 {
            seq[15] = 0x02;
        }
    }
    seq
}

/// Page-select command for page `page`
///
/// Only the low three bits of `page` are significant.
pub const fn set_page_start(page: u8) -> u8 {
    SET_PAGE_START | (page & 0x07)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_sequence_matches_controller_table() {
        let expected = [
            0xAE, 0xD5, 0x80, 0xA8, 0x3F, 0xD3, 0x00, 0x40, 0x8D, 0x14, 0x20, 0x00, 0xA1, 0xC8,
            0xDA, 0x12, 0x81, 0xCF, 0xD9, 0xF1, 0xDB, 0x40, 0xA4, 0xA6, 0xAF,
        ];
        assert_eq!(INIT_SEQUENCE, expected);
    }

    #[test]
    fn test_init_sequence_starts_off_and_ends_on() {
        assert_eq!(INIT_SEQUENCE.first(), Some(&DISPLAY_OFF));
        assert_eq!(INIT_SEQUENCE.last(), Some(&DISPLAY_ON));
    }

    #[test]
    fn test_init_sequence_by_height() {
        assert_eq!(init_sequence(64), INIT_SEQUENCE);
        let short = init_sequence(32);
        assert_eq!(short[3..5], [SET_MULTIPLEX, 0x1F]);
        assert_eq!(short[14..16], [SET_COM_PINS, 0x02]);
        let mid = init_sequence(48);
        assert_eq!(mid[4], 0x2F);
        assert_eq!(mid[15], 0x12);
    }

    #[test]
    fn test_set_page_start() {
        assert_eq!(set_page_start(0), 0xB0);
        assert_eq!(set_page_start(7), 0xB7);
        assert_eq!(set_page_start(9), 0xB1);
    }
}
