//! Conway's Game of Life on a toroidal grid
//!
//! The grid is double-buffered: each generation is computed entirely from
//! the previous one into a separate buffer, then the buffers swap roles.
//! Rendering only touches cells whose state changed between the last two
//! generations.
//!
//! ```
//! use ssd1306_sim::sim::CellGrid;
//!
//! let mut grid: CellGrid<5, 5> = CellGrid::new();
//! grid.place(1, 2, &["###"]);
//! let mut next = CellGrid::new();
//! grid.step_into(&mut next);
//! assert!(next.get(2, 1) && next.get(2, 2) && next.get(2, 3));
//! assert_eq!(next.population(), 3);
//! ```

use core::time::Duration;

use rand::Rng;

use super::{Simulation, rng};
use crate::framebuffer::FrameBuffer;

/// Fixed-size grid of live/dead cells with wrapping edges
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid<const W: usize, const H: usize> {
    cells: [[bool; W]; H],
}

impl<const W: usize, const H: usize> Default for CellGrid<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> CellGrid<W, H> {
    /// All cells dead
    pub const fn new() -> Self {
        Self {
            cells: [[false; W]; H],
        }
    }

    /// Each cell alive with probability one half
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut grid = Self::new();
        for row in &mut grid.cells {
            for cell in row.iter_mut() {
                *cell = rng.gen_bool(0.5);
            }
        }
        grid
    }

    /// Stamp a pattern with its top-left corner at `(x, y)`
    ///
    /// Each string is one row; `#` and `O` are live, anything else is dead.
    /// Coordinates wrap like the grid itself.
    pub fn place(&mut self, x: usize, y: usize, rows: &[&str]) {
        for (dy, row) in rows.iter().enumerate() {
            for (dx, ch) in row.chars().enumerate() {
                self.set(x + dx, y + dy, matches!(ch, '#' | 'O'));
            }
        }
    }

    /// Cell state; coordinates wrap
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[y % H][x % W]
    }

    /// Set a cell; coordinates wrap
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        self.cells[y % H][x % W] = alive;
    }

    /// Live cells among the eight neighbours, wrapping at the edges
    pub fn live_neighbors(&self, x: usize, y: usize) -> u8 {
        let mut count = 0;
        for dy in [H - 1, 0, 1] {
            for dx in [W - 1, 0, 1] {
                if (dx, dy) != (0, 0) && self.get(x + dx, y + dy) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Compute the next generation into `next`
    ///
    /// Reads only `self`, so `next` never aliases the generation being read.
    pub fn step_into(&self, next: &mut Self) {
        for y in 0..H {
            for x in 0..W {
                let n = self.live_neighbors(x, y);
                next.cells[y][x] = matches!((self.cells[y][x], n), (true, 2 | 3) | (false, 3));
            }
        }
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().flatten().filter(|&&alive| alive).count()
    }

    /// Grid width in cells
    pub const fn width(&self) -> usize {
        W
    }

    /// Grid height in cells
    pub const fn height(&self) -> usize {
        H
    }
}

/// Life tuning
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifeConfig {
    /// Side of one cell in pixels
    pub cell_size: i32,
    /// Seed for random starting grids
    pub seed: u64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            cell_size: 1,
            seed: rng::DEFAULT_SEED,
        }
    }
}

/// Game of Life simulation
#[derive(Clone, Debug)]
pub struct Life<const W: usize, const H: usize> {
    config: LifeConfig,
    current: CellGrid<W, H>,
    previous: CellGrid<W, H>,
    /// Generations computed since the last render
    pending: u32,
    /// Whether the framebuffer holds a complete picture of `previous`
    synced: bool,
}

impl<const W: usize, const H: usize> Life<W, H> {
    /// Start from a random grid seeded by `config.seed`
    pub fn new(config: LifeConfig) -> Self {
        let mut rng = rng::seeded(config.seed);
        Self::with_grid(CellGrid::random(&mut rng), config)
    }

    /// Start from a given grid
    pub fn with_grid(grid: CellGrid<W, H>, config: LifeConfig) -> Self {
        Self {
            config,
            current: grid,
            previous: CellGrid::new(),
            pending: 0,
            synced: false,
        }
    }

    /// Current generation
    pub fn grid(&self) -> &CellGrid<W, H> {
        &self.current
    }

    fn draw_cell<B>(&self, frame: &mut FrameBuffer<B>, x: usize, y: usize, alive: bool)
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let size = self.config.cell_size;
        frame.fill_rect(x as i32 * size, y as i32 * size, size, size, alive);
    }
}

impl<const W: usize, const H: usize> Simulation for Life<W, H> {
    fn advance(&mut self, _dt: Duration) -> bool {
        core::mem::swap(&mut self.current, &mut self.previous);
        self.previous.step_into(&mut self.current);
        self.pending += 1;
        false
    }

    fn render<B>(&mut self, frame: &mut FrameBuffer<B>)
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        // The diff against `previous` only covers one generation
        let full = !self.synced || self.pending > 1;
        if full {
            frame.clear();
        }
        for y in 0..H {
            for x in 0..W {
                let alive = self.current.get(x, y);
                if full {
                    if alive {
                        self.draw_cell(frame, x, y, true);
                    }
                } else if alive != self.previous.get(x, y) {
                    self.draw_cell(frame, x, y, alive);
                }
            }
        }
        self.synced = true;
        self.pending = 0;
    }

    fn reset(&mut self) {
        self.synced = false;
    }
}
