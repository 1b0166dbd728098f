//! Time and date readout
//!
//! Shows `HH:MM:SS` above `MM/DD/YYYY`, both centred at double size. Only
//! character cells whose text changed since the last render are redrawn, so
//! a typical tick dirties a single page.

use core::fmt::Write as _;
use core::time::Duration;

use heapless::String;

use super::Simulation;
use crate::config::Dimensions;
use crate::font::{self, GLYPH_HEIGHT};
use crate::framebuffer::FrameBuffer;

const SCALE: i32 = 2;
const TIME_CHARS: i32 = 8;
const DATE_CHARS: i32 = 10;

/// Calendar date and wall-clock time, one-second resolution
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    /// Four-digit year
    pub year: u16,
    /// 1..=12
    pub month: u8,
    /// 1..=31
    pub day: u8,
    /// 0..=23
    pub hour: u8,
    /// 0..=59
    pub minute: u8,
    /// 0..=59
    pub second: u8,
}

impl ClockTime {
    /// Build from calendar fields; no range checks
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// `HH:MM:SS`
    pub fn time_text(&self) -> String<8> {
        let mut s = String::new();
        // Capacity only runs out for out-of-range fields
        let _ = write!(s, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second);
        s
    }

    /// `MM/DD/YYYY`
    pub fn date_text(&self) -> String<10> {
        let mut s = String::new();
        let _ = write!(s, "{:02}/{:02}/{:04}", self.month, self.day, self.year);
        s
    }

    /// Gregorian leap year rule
    pub const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Days in the current month
    pub const fn days_in_month(&self) -> u8 {
        match self.month {
            2 if Self::is_leap_year(self.year) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Step forward one second, rolling over into minutes, days, months and years
    ///
    /// A field already past its range rolls over as if it were at its maximum.
    pub fn tick(&mut self) {
        if self.second < 59 {
            self.second += 1;
            return;
        }
        self.second = 0;
        if self.minute < 59 {
            self.minute += 1;
            return;
        }
        self.minute = 0;
        if self.hour < 23 {
            self.hour += 1;
            return;
        }
        self.hour = 0;
        if self.day < self.days_in_month() {
            self.day += 1;
            return;
        }
        self.day = 1;
        if self.month < 12 {
            self.month += 1;
            return;
        }
        self.month = 1;
        self.year = self.year.wrapping_add(1);
    }
}

/// Where the clock reads the current time from
///
/// Hardware builds implement this over an RTC; [`SteppedClock`] counts
/// frame time instead.
pub trait TimeSource {
    /// Current time
    fn now(&mut self) -> ClockTime;

    /// Called once per frame with the frame's wall time
    fn advance(&mut self, _dt: Duration) {}
}

/// Calendar time driven by frame durations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SteppedClock {
    time: ClockTime,
    carry: Duration,
}

impl SteppedClock {
    /// Start counting from `start`
    pub const fn new(start: ClockTime) -> Self {
        Self {
            time: start,
            carry: Duration::ZERO,
        }
    }
}

impl TimeSource for SteppedClock {
    fn now(&mut self) -> ClockTime {
        self.time
    }

    fn advance(&mut self, dt: Duration) {
        const SECOND: Duration = Duration::from_secs(1);
        self.carry += dt;
        while self.carry >= SECOND {
            self.carry -= SECOND;
            self.time.tick();
        }
    }
}

/// Clock simulation
#[derive(Clone, Debug)]
pub struct Clock<T> {
    source: T,
    time_x: i32,
    date_x: i32,
    time_y: i32,
    date_y: i32,
    shown_time: String<8>,
    shown_date: String<10>,
    synced: bool,
}

impl<T: TimeSource> Clock<T> {
    /// Clock laid out for `dimensions`, reading time from `source`
    pub fn new(dimensions: Dimensions, source: T) -> Self {
        let width = i32::from(dimensions.width());
        let cell = font::advance(SCALE);
        let time_y = i32::from(dimensions.height()) / 4;
        Self {
            source,
            time_x: (width - TIME_CHARS * cell) / 2,
            date_x: (width - DATE_CHARS * cell) / 2,
            time_y,
            date_y: time_y + SCALE * GLYPH_HEIGHT + 2,
            shown_time: String::new(),
            shown_date: String::new(),
            synced: false,
        }
    }

    /// Time source
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Time source, for setting the time
    pub fn source_mut(&mut self) -> &mut T {
        &mut self.source
    }
}

/// Redraw the cells of `next` that differ from `shown`
fn redraw_changed<B>(frame: &mut FrameBuffer<B>, x: i32, y: i32, shown: &str, next: &str)
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let cell = font::advance(SCALE);
    let (old, new) = (shown.as_bytes(), next.as_bytes());
    for i in 0..old.len().max(new.len()) {
        let (before, after) = (old.get(i), new.get(i));
        if before == after {
            continue;
        }
        let cx = x + i as i32 * cell;
        frame.fill_rect(cx, y, cell, SCALE * GLYPH_HEIGHT, false);
        if let Some(&ch) = after {
            frame.draw_glyph_scaled(cx, y, font::glyph(char::from(ch)), SCALE, true);
        }
    }
}

impl<T: TimeSource> Simulation for Clock<T> {
    fn advance(&mut self, dt: Duration) -> bool {
        self.source.advance(dt);
        false
    }

    fn render<B>(&mut self, frame: &mut FrameBuffer<B>)
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        if !self.synced {
            frame.clear();
            self.shown_time.clear();
            self.shown_date.clear();
            self.synced = true;
        }
        let now = self.source.now();
        let (time, date) = (now.time_text(), now.date_text());
        redraw_changed(frame, self.time_x, self.time_y, &self.shown_time, &time);
        redraw_changed(frame, self.date_x, self.date_y, &self.shown_date, &date);
        self.shown_time = time;
        self.shown_date = date;
    }

    fn reset(&mut self) {
        self.synced = false;
    }
}
