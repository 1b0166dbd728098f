//! Prime number ticker
//!
//! Each frame finds the next prime and prints it in the top-left corner.

use core::fmt::Write as _;
use core::time::Duration;

use heapless::String;

use super::Simulation;
use crate::font::GLYPH_HEIGHT;
use crate::framebuffer::FrameBuffer;

/// Prime ticker simulation
///
/// Reaching the largest `u32` prime is a terminal state; [`reset`](Simulation::reset)
/// starts over from 2.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrimeTicker {
    current: u32,
}

impl PrimeTicker {
    /// Nothing shown until the first [`advance`](Simulation::advance)
    pub const fn new() -> Self {
        Self { current: 0 }
    }

    /// Prime currently shown, 0 before the first frame
    pub const fn current(&self) -> u32 {
        self.current
    }
}

/// Trial division up to the square root
fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    let n = u64::from(n);
    let mut i = 2u64;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

impl Simulation for PrimeTicker {
    fn advance(&mut self, _dt: Duration) -> bool {
        let mut candidate = self.current;
        loop {
            candidate = match candidate.checked_add(1) {
                Some(c) => c,
                None => return true,
            };
            if is_prime(candidate) {
                self.current = candidate;
                return false;
            }
        }
    }

    fn render<B>(&mut self, frame: &mut FrameBuffer<B>)
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let mut text: String<10> = String::new();
        let _ = write!(text, "{}", self.current);
        frame.fill_rect(0, 0, frame.width(), GLYPH_HEIGHT, false);
        frame.draw_text(0, 0, &text, 1);
    }

    fn reset(&mut self) {
        log::info!("primes: wrapped after {}", self.current);
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dimensions;
    use crate::font;

    const FRAME: Duration = Duration::from_millis(10);

    #[test]
    fn test_is_prime() {
        let primes: heapless::Vec<u32, 16> = (0..40).filter(|&n| is_prime(n)).collect();
        assert_eq!(&primes[..], &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37]);
        assert!(is_prime(4_294_967_291));
        assert!(!is_prime(u32::MAX));
    }

    #[test]
    fn test_ticks_through_primes() {
        let mut ticker = PrimeTicker::new();
        let mut seen = [0u32; 6];
        for slot in &mut seen {
            assert!(!ticker.advance(FRAME));
            *slot = ticker.current();
        }
        assert_eq!(seen, [2, 3, 5, 7, 11, 13]);
    }

    #[test]
    fn test_largest_prime_is_terminal() {
        let mut ticker = PrimeTicker { current: 4_294_967_291 };
        assert!(ticker.advance(FRAME));
        ticker.reset();
        ticker.advance(FRAME);
        assert_eq!(ticker.current(), 2);
    }

    #[test]
    fn test_render_replaces_previous_number() {
        let mut ticker = PrimeTicker { current: 96 };
        let mut fb = FrameBuffer::new_vec(Dimensions::default());
        ticker.advance(FRAME);
        assert_eq!(ticker.current(), 97);
        ticker.render(&mut fb);
        ticker.advance(FRAME);
        ticker.render(&mut fb);

        let mut expected = FrameBuffer::new_vec(Dimensions::default());
        expected.draw_text(0, 0, "101", 1);
        assert_eq!(fb.as_bytes(), expected.as_bytes());
        assert_eq!(font::text_width("101", 1), 18);
    }
}
