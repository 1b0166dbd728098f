//! Graphics support via embedded-graphics
//!
//! Implements [`DrawTarget`] for [`FrameBuffer`] with [`BinaryColor`], so the
//! whole embedded-graphics ecosystem (primitives, mono fonts, images) can
//! draw next to the built-in primitives.
//!
//! `BinaryColor::On` lights a pixel and `BinaryColor::Off` clears it.
//! Pixels outside the screen are dropped, as with every other drawing call.
//!
//! ## Example
//!
//! ```
//! use embedded_graphics::{
//!     pixelcolor::BinaryColor,
//!     prelude::*,
//!     primitives::{PrimitiveStyle, Rectangle},
//! };
//! use ssd1306_sim::{Dimensions, FrameBuffer};
//!
//! let mut fb = FrameBuffer::new([0u8; 1024], Dimensions::default());
//!
//! let _ = Rectangle::new(Point::new(10, 10), Size::new(20, 8))
//!     .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
//!     .draw(&mut fb);
//!
//! assert!(fb.get_pixel(10, 10));
//! assert_eq!(fb.size(), Size::new(128, 64));
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
    prelude::Pixel,
};

use crate::framebuffer::FrameBuffer;

impl<B> DrawTarget for FrameBuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            self.set_pixel(x, y, color.is_on());
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        match color {
            BinaryColor::Off => FrameBuffer::clear(self),
            BinaryColor::On => self.fill_rect(0, 0, self.width(), self.height(), true),
        }
        Ok(())
    }
}

impl<B> OriginDimensions for FrameBuffer<B>
where
    B: AsRef<[u8]>,
{
    fn size(&self) -> Size {
        let dims = self.dimensions();
        Size::new(u32::from(dims.width()), u32::from(dims.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dimensions;
    use embedded_graphics::{
        mono_font::{MonoTextStyle, ascii::FONT_6X10},
        prelude::*,
        primitives::{Line, PrimitiveStyle},
        text::Text,
    };

    fn fb() -> FrameBuffer<[u8; 1024]> {
        FrameBuffer::new([0u8; 1024], Dimensions::default())
    }

    #[test]
    fn test_size_reports_dimensions() {
        let fb = FrameBuffer::new([0u8; 512], Dimensions::new(128, 32).unwrap());
        assert_eq!(fb.size(), Size::new(128, 32));
    }

    #[test]
    fn test_draw_iter_sets_and_clears() {
        let mut fb = fb();
        fb.draw_iter([
            Pixel(Point::new(1, 1), BinaryColor::On),
            Pixel(Point::new(2, 2), BinaryColor::On),
            Pixel(Point::new(-5, 2), BinaryColor::On),
            Pixel(Point::new(2, 2), BinaryColor::Off),
        ])
        .unwrap();
        assert!(fb.get_pixel(1, 1));
        assert!(!fb.get_pixel(2, 2));
    }

    #[test]
    fn test_line_primitive_matches_builtin() {
        let mut ours = fb();
        ours.draw_line(0, 0, 10, 0, true);

        let mut theirs = fb();
        Line::new(Point::new(0, 0), Point::new(10, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut theirs)
            .unwrap();

        assert_eq!(ours.as_bytes(), theirs.as_bytes());
    }

    #[test]
    fn test_text_draws_inside_screen() {
        let mut fb = fb();
        Text::new(
            "OK",
            Point::new(0, 10),
            MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
        )
        .draw(&mut fb)
        .unwrap();
        assert!(fb.as_bytes().iter().any(|&b| b != 0));
    }

    #[test]
    fn test_clear_on_fills_every_byte() {
        let mut fb = fb();
        DrawTarget::clear(&mut fb, BinaryColor::On).unwrap();
        assert!(fb.as_bytes().iter().all(|&b| b == 0xFF));
        DrawTarget::clear(&mut fb, BinaryColor::Off).unwrap();
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }
}
