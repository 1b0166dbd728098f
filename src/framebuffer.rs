//! Page-packed 1 bit per pixel framebuffer
//!
//! Layout mirrors the controller's display RAM: the screen is cut into
//! horizontal pages of 8 rows, and each page holds one byte per column.
//!
//! ```text
//! page  = y / 8
//! bit   = y % 8          (bit 0 is the top row of the page)
//! index = x + page * width
//! ```
//!
//! Every drawing call funnels through [`FrameBuffer::set_pixel`], which drops
//! writes outside `[0, width) x [0, height)` without touching memory. Coordinates
//! are therefore signed: shapes may hang off any edge and are clipped.
//!
//! ## Dirty tracking
//!
//! The buffer keeps one dirty bit per page. A bit is raised only when a byte
//! of that page actually changes value, so redrawing identical content keeps
//! the page clean. [`Display::flush`](crate::Display::flush) consumes the mask
//! when configured with [`FlushMode::DirtyPages`](crate::FlushMode::DirtyPages).
//!
//! ## Example
//!
//! ```
//! use ssd1306_sim::{Dimensions, FrameBuffer};
//!
//! let mut fb = FrameBuffer::new([0u8; 1024], Dimensions::default());
//! fb.set_pixel(3, 10, true);
//! assert_eq!(fb.as_bytes()[3 + 128], 0b0000_0100);
//! assert!(fb.is_page_dirty(1));
//!
//! // Off-screen writes are ignored
//! fb.set_pixel(-1, 500, true);
//! fb.draw_text(0, 56, "HI", 1);
//! assert!(fb.get_pixel(0, 56));
//! ```

use crate::config::Dimensions;
use crate::error::BuilderError;
use crate::font::{self, Glyph};
use crate::geometry::Point;
use crate::raster::{self, Line};

/// Packed monochrome bitmap over a caller-provided byte buffer
///
/// ## Type Parameters
///
/// * `B` - Backing storage, e.g. `[u8; 1024]`, `&mut [u8]` or `Vec<u8>`.
///   It must hold at least `dimensions.buffer_size()` bytes; extra bytes
///   are ignored.
#[derive(Clone, Debug)]
pub struct FrameBuffer<B> {
    /// Backing bytes
    buffer: B,
    /// Pixel geometry
    dimensions: Dimensions,
    /// One bit per page, raised on change
    dirty: u8,
}

impl<B: AsRef<[u8]>> FrameBuffer<B> {
    /// Wrap a buffer
    ///
    /// The contents are kept as-is and every page starts dirty, so the first
    /// flush always sends the whole picture.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is smaller than `dimensions.buffer_size()`.
    pub fn new(buffer: B, dimensions: Dimensions) -> Self {
        let required = dimensions.buffer_size();
        assert!(
            buffer.as_ref().len() >= required,
            "buffer too small: required {} bytes, got {}",
            required,
            buffer.as_ref().len()
        );
        Self::wrap(buffer, dimensions)
    }

    /// Wrap a buffer, returning an error if it is too small
    ///
    /// This is the fallible version of [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::BufferTooSmall` if `buffer` is smaller than
    /// `dimensions.buffer_size()`.
    pub fn try_new(buffer: B, dimensions: Dimensions) -> Result<Self, BuilderError> {
        let required = dimensions.buffer_size();
        let provided = buffer.as_ref().len();
        if provided < required {
            return Err(BuilderError::BufferTooSmall { required, provided });
        }
        Ok(Self::wrap(buffer, dimensions))
    }

    fn wrap(buffer: B, dimensions: Dimensions) -> Self {
        let mut fb = Self {
            buffer,
            dimensions,
            dirty: 0,
        };
        fb.mark_all_dirty();
        fb
    }

    /// Pixel geometry
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Width in pixels
    pub fn width(&self) -> i32 {
        i32::from(self.dimensions.width())
    }

    /// Height in pixels
    pub fn height(&self) -> i32 {
        i32::from(self.dimensions.height())
    }

    /// Packed bytes, page-major, exactly `dimensions.buffer_size()` long
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.dimensions.buffer_size()]
    }

    /// Bytes of page `page`, one per column
    ///
    /// Returns `None` past the last page.
    pub fn page(&self, page: u8) -> Option<&[u8]> {
        if page >= self.dimensions.pages() {
            return None;
        }
        let width = usize::from(self.dimensions.width());
        let start = usize::from(page) * width;
        Some(&self.as_bytes()[start..start + width])
    }

    /// Read back a pixel; off-screen reads are `false`
    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        self.locate(x, y)
            .is_some_and(|(index, mask)| self.as_bytes()[index] & mask != 0)
    }

    /// Byte index and bit mask of an on-screen pixel
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        let index = x + (y / 8) * usize::from(self.dimensions.width());
        Some((index, 1 << (y % 8)))
    }

    /// Dirty mask, bit `p` set when page `p` changed since [`mark_clean`](Self::mark_clean)
    pub fn dirty_pages(&self) -> u8 {
        self.dirty
    }

    /// Whether page `page` changed since the last [`mark_clean`](Self::mark_clean)
    pub fn is_page_dirty(&self, page: u8) -> bool {
        page < 8 && self.dirty & (1 << page) != 0
    }

    /// Flag every page as changed
    pub fn mark_all_dirty(&mut self) {
        self.dirty = match self.dimensions.pages() {
            8.. => 0xFF,
            pages => (1 << pages) - 1,
        };
    }

    /// Forget all pending changes
    pub fn mark_clean(&mut self) {
        self.dirty = 0;
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> FrameBuffer<B> {
    fn bytes_mut(&mut self) -> &mut [u8] {
        let len = self.dimensions.buffer_size();
        &mut self.buffer.as_mut()[..len]
    }

    /// Set every pixel off
    pub fn clear(&mut self) {
        let width = usize::from(self.dimensions.width());
        let mut changed = 0u8;
        for (page, bytes) in self.bytes_mut().chunks_mut(width).enumerate() {
            if bytes.iter().any(|&b| b != 0) {
                bytes.fill(0);
                changed |= 1 << page;
            }
        }
        self.dirty |= changed;
    }

    /// Turn one pixel on or off
    ///
    /// Writes outside the screen are silently dropped.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        let Some((index, mask)) = self.locate(x, y) else {
            return;
        };
        let page = y / 8;
        let byte = &mut self.bytes_mut()[index];
        let old = *byte;
        *byte = if on { old | mask } else { old & !mask };
        if *byte != old {
            self.dirty |= 1 << page;
        }
    }

    /// Fill the `w x h` block whose top-left corner is `(x, y)`
    ///
    /// Non-positive sizes draw nothing. Only the on-screen part is visited.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, on: bool) {
        let right = x.saturating_add(w).min(self.width());
        let bottom = y.saturating_add(h).min(self.height());
        for px in x.max(0)..right {
            for py in y.max(0)..bottom {
                self.set_pixel(px, py, on);
            }
        }
    }

    /// Draw a line between two points, both inclusive
    ///
    /// Lines whose bounding box misses the screen are skipped outright.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, on: bool) {
        if x0.max(x1) < 0
            || y0.max(y1) < 0
            || x0.min(x1) >= self.width()
            || y0.min(y1) >= self.height()
        {
            return;
        }
        for p in Line::new(Point::new(x0, y0), Point::new(x1, y1)) {
            self.set_pixel(p.x, p.y, on);
        }
    }

    /// Draw a filled circle of radius `r` centred at `(cx, cy)`
    pub fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, on: bool) {
        let columns = 0..=i64::from(self.width()) - 1;
        let rows = 0..=i64::from(self.height()) - 1;
        for p in raster::filled_circle_within(Point::new(cx, cy), r, columns, rows) {
            self.set_pixel(p.x, p.y, on);
        }
    }

    /// Blit a glyph at 1:1
    ///
    /// Only set bits are plotted, with the value `on`.
    pub fn draw_glyph(&mut self, x: i32, y: i32, glyph: &Glyph, on: bool) {
        self.draw_glyph_scaled(x, y, glyph, 1, on);
    }

    /// Blit a glyph with each pixel expanded to a `scale x scale` block
    pub fn draw_glyph_scaled(&mut self, x: i32, y: i32, glyph: &Glyph, scale: i32, on: bool) {
        for block in raster::glyph_blocks(Point::new(x, y), glyph, scale) {
            self.fill_rect(block.x, block.y, block.w, block.h, on);
        }
    }

    /// Draw a string left to right starting at `(x, y)`
    ///
    /// Each character advances by `(5 + 1) * scale` pixels. Returns the x
    /// coordinate just past the last character.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, scale: i32) -> i32 {
        let mut cursor = x;
        for ch in text.chars() {
            self.draw_glyph_scaled(cursor, y, font::glyph(ch), scale, true);
            cursor = cursor.saturating_add(font::advance(scale));
        }
        cursor
    }

    /// Copy `other` into this buffer page by page
    ///
    /// Only pages whose bytes differ are copied and marked dirty, so an
    /// unchanged picture leaves nothing to flush. Returns the mask of pages
    /// that changed. Nothing is copied if the dimensions differ.
    pub fn replace_with<O: AsRef<[u8]>>(&mut self, other: &FrameBuffer<O>) -> u8 {
        if other.dimensions != self.dimensions {
            log::warn!(
                "replace_with: dimension mismatch {:?} vs {:?}",
                self.dimensions,
                other.dimensions
            );
            return 0;
        }
        let width = usize::from(self.dimensions.width());
        let mut changed = 0u8;
        let source = other.as_bytes().chunks(width);
        for (page, (dst, src)) in self.bytes_mut().chunks_mut(width).zip(source).enumerate() {
            if dst != src {
                dst.copy_from_slice(src);
                changed |= 1 << page;
            }
        }
        self.dirty |= changed;
        changed
    }

    /// Release the backing buffer
    pub fn release(self) -> B {
        self.buffer
    }
}

#[cfg(any(test, feature = "alloc"))]
impl FrameBuffer<alloc::vec::Vec<u8>> {
    /// Allocate a zeroed buffer of the right size
    pub fn new_vec(dimensions: Dimensions) -> Self {
        Self::wrap(alloc::vec![0u8; dimensions.buffer_size()], dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fb() -> FrameBuffer<[u8; 1024]> {
        let mut fb = FrameBuffer::new([0u8; 1024], Dimensions::default());
        fb.mark_clean();
        fb
    }

    #[test]
    fn test_set_pixel_bit_layout() {
        let mut fb = fb();
        fb.set_pixel(0, 0, true);
        fb.set_pixel(127, 63, true);
        fb.set_pixel(5, 9, true);
        let bytes = fb.as_bytes();
        assert_eq!(bytes[0], 0x01);
        assert_eq!(bytes[127 + 7 * 128], 0x80);
        assert_eq!(bytes[5 + 128], 0x02);
    }

    #[test]
    fn test_set_pixel_off_clears_only_its_bit() {
        let mut fb = fb();
        fb.fill_rect(0, 0, 1, 8, true);
        fb.set_pixel(0, 3, false);
        assert_eq!(fb.as_bytes()[0], 0xF7);
    }

    #[test]
    fn test_out_of_bounds_is_noop() {
        let mut fb = fb();
        fb.set_pixel(-1, 0, true);
        fb.set_pixel(0, -1, true);
        fb.set_pixel(128, 0, true);
        fb.set_pixel(0, 64, true);
        fb.set_pixel(i32::MAX, i32::MIN, true);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(fb.dirty_pages(), 0);
        assert!(!fb.get_pixel(-1, 0));
    }

    #[test]
    fn test_far_off_screen_drawing_is_clipped() {
        let mut fb = fb();
        fb.fill_rect(i32::MAX - 1, 0, 5, 1, true);
        fb.fill_rect(i32::MIN, i32::MIN, i32::MAX, i32::MAX, true);
        fb.draw_line(-2_000_000_000, -5, 2_000_000_000, -5, true);
        fb.draw_line(i32::MIN, i32::MIN, i32::MIN + 5, i32::MAX, true);
        fb.draw_circle(i32::MAX, i32::MAX, i32::MAX, true);
        fb.draw_glyph_scaled(i32::MAX - 3, 0, font::glyph('8'), 1000, true);
        let end = fb.draw_text(i32::MAX - 10, 0, "WRAP", i32::MAX);
        assert_eq!(end, i32::MAX);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(fb.dirty_pages(), 0);

        // Huge shapes still cover the screen correctly
        fb.fill_rect(-1_000_000_000, 0, i32::MAX, 1, true);
        assert_eq!(fb.page(0).unwrap(), [0x01; 128]);
        fb.draw_circle(0, 0, i32::MAX, true);
        assert!(fb.as_bytes().iter().all(|&b| b == 0xFF));
        fb.clear();
        // Column 1 of '8' has its top bit set
        fb.draw_glyph_scaled(-1_000_000, 0, font::glyph('8'), 1_000_000, true);
        assert!(fb.as_bytes().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_clear_zeroes_everything() {
        let mut fb = fb();
        fb.fill_rect(10, 10, 30, 30, true);
        fb.clear();
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill_rect_clips_at_edges() {
        let mut fb = fb();
        fb.fill_rect(126, 62, 5, 5, true);
        assert!(fb.get_pixel(127, 63));
        assert!(fb.get_pixel(126, 62));
        assert_eq!(fb.as_bytes().iter().map(|b| b.count_ones()).sum::<u32>(), 4);
    }

    #[test]
    fn test_fill_rect_negative_size_draws_nothing() {
        let mut fb = fb();
        fb.fill_rect(10, 10, -3, 4, true);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_dirty_only_on_change() {
        let mut fb = fb();
        fb.set_pixel(0, 20, false);
        assert_eq!(fb.dirty_pages(), 0);
        fb.set_pixel(0, 20, true);
        assert_eq!(fb.dirty_pages(), 0b0000_0100);
        fb.mark_clean();
        fb.set_pixel(0, 20, true);
        assert_eq!(fb.dirty_pages(), 0);
    }

    #[test]
    fn test_new_starts_all_dirty() {
        let fb = FrameBuffer::new([0u8; 512], Dimensions::new(128, 32).unwrap());
        assert_eq!(fb.dirty_pages(), 0b0000_1111);
        let fb = FrameBuffer::new([0u8; 1024], Dimensions::default());
        assert_eq!(fb.dirty_pages(), 0xFF);
    }

    #[test]
    fn test_page_slices() {
        let mut fb = fb();
        fb.set_pixel(2, 17, true);
        assert_eq!(fb.page(2).unwrap()[2], 0x02);
        assert_eq!(fb.page(2).unwrap().len(), 128);
        assert!(fb.page(8).is_none());
    }

    #[test]
    fn test_draw_line_and_circle() {
        let mut fb = fb();
        fb.draw_line(0, 0, 10, 0, true);
        assert_eq!(fb.as_bytes()[..11], [0x01; 11]);
        assert_eq!(fb.as_bytes()[11], 0);

        fb.clear();
        fb.draw_circle(64, 32, 3, true);
        let lit = fb.as_bytes().iter().map(|b| b.count_ones()).sum::<u32>();
        assert_eq!(lit, 29);
        assert!(fb.get_pixel(67, 32));
        assert!(!fb.get_pixel(67, 35));
    }

    #[test]
    fn test_draw_glyph_columns() {
        let mut fb = fb();
        fb.draw_glyph(0, 0, font::glyph('1'), true);
        assert_eq!(fb.as_bytes()[..5], [0x00, 0x42, 0x7F, 0x40, 0x00]);
    }

    #[test]
    fn test_draw_glyph_leaves_background() {
        let mut fb = fb();
        fb.fill_rect(0, 0, 5, 8, true);
        fb.draw_glyph(0, 0, &font::BLANK, false);
        assert_eq!(fb.as_bytes()[..5], [0xFF; 5]);
        fb.draw_glyph(0, 0, font::glyph('-'), false);
        assert_eq!(fb.as_bytes()[..5], [0xF7; 5]);
    }

    #[test]
    fn test_draw_text_advances_by_six_times_scale() {
        let mut fb = fb();
        let end = fb.draw_text(0, 0, "11", 1);
        assert_eq!(end, 12);
        assert_eq!(fb.as_bytes()[6..11], [0x00, 0x42, 0x7F, 0x40, 0x00]);

        fb.clear();
        let end = fb.draw_text(4, 8, "1", 2);
        assert_eq!(end, 16);
        // Column 2 of '1' is 0x7F: rows 0-6, doubled to 14 rows
        assert!(fb.get_pixel(4 + 4, 8));
        assert!(fb.get_pixel(4 + 5, 8 + 13));
        assert!(!fb.get_pixel(4 + 4, 8 + 14));
    }

    #[test]
    fn test_unknown_character_draws_blank() {
        let mut fb = fb();
        fb.draw_text(0, 0, "~", 1);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_replace_with_copies_changed_pages_only() {
        let mut target = fb();
        target.set_pixel(0, 0, true);
        target.mark_clean();

        let mut next = FrameBuffer::new_vec(Dimensions::default());
        next.set_pixel(0, 0, true);
        next.set_pixel(50, 40, true);

        assert_eq!(target.replace_with(&next), 0b0010_0000);
        assert_eq!(target.dirty_pages(), 0b0010_0000);
        assert_eq!(target.as_bytes(), next.as_bytes());

        target.mark_clean();
        assert_eq!(target.replace_with(&next), 0);
        assert_eq!(target.dirty_pages(), 0);
    }

    #[test]
    fn test_replace_with_dimension_mismatch_copies_nothing() {
        let mut target = fb();
        let mut other = FrameBuffer::new_vec(Dimensions::new(128, 32).unwrap());
        other.set_pixel(1, 1, true);
        assert_eq!(target.replace_with(&other), 0);
        assert!(!target.get_pixel(1, 1));
    }

    #[test]
    fn test_try_new_rejects_short_buffer() {
        let result = FrameBuffer::try_new([0u8; 100], Dimensions::default());
        assert!(matches!(
            result,
            Err(BuilderError::BufferTooSmall {
                required: 1024,
                provided: 100
            })
        ));
    }

    #[test]
    #[should_panic(expected = "buffer too small")]
    fn test_new_panics_on_short_buffer() {
        let _ = FrameBuffer::new([0u8; 100], Dimensions::default());
    }

    #[test]
    fn test_oversized_buffer_is_trimmed() {
        let fb = FrameBuffer::new([0u8; 1024], Dimensions::new(64, 32).unwrap());
        assert_eq!(fb.as_bytes().len(), 256);
    }
}
