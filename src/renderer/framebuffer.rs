//! Palette-indexed frame pages.
//!
//! The view is 120 columns by 64 *logical* rows. Every logical row is
//! stored twice, so a page is 120 × 128 bytes and callers never deal with
//! the doubling themselves.

/// Screen columns.
pub const VIEW_WIDTH: usize = 120;
/// Logical rows.
pub const VIEW_ROWS: usize = 64;
/// First logical row of the lower half; floor bands are counted from here.
pub const HORIZON: usize = VIEW_ROWS / 2;
/// Stored rows per logical row.
pub const ROW_SCALE: usize = 2;
/// Stored rows per page.
pub const FB_ROWS: usize = VIEW_ROWS * ROW_SCALE;

pub const BLACK: u8 = 0x00;
/// Health bar, blood overlay, damage flash and the death screen border.
pub const RED: u8 = 0x2A;
/// Never written by sprites or HUD graphics.
pub const COLOR_KEY: u8 = 0x0C;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Vec<u8>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self {
            pixels: vec![BLACK; VIEW_WIDTH * FB_ROWS],
        }
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `color` to both stored rows of logical `row`.
    #[inline(always)]
    pub fn plot(&mut self, x: usize, row: usize, color: u8) {
        debug_assert!(x < VIEW_WIDTH && row < VIEW_ROWS);
        let i = row * ROW_SCALE * VIEW_WIDTH + x;
        self.pixels[i] = color;
        self.pixels[i + VIEW_WIDTH] = color;
    }

    /// Colour at logical `row` (read from its first stored row).
    #[inline]
    pub fn get(&self, x: usize, row: usize) -> u8 {
        self.pixels[row * ROW_SCALE * VIEW_WIDTH + x]
    }

    pub fn fill(&mut self, color: u8) {
        self.pixels.fill(color);
    }

    /// All `VIEW_WIDTH * FB_ROWS` stored bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Double-buffered pages: the renderer paints `back_mut()`, `swap()`
/// publishes it as `front()`.
#[derive(Clone, Debug, Default)]
pub struct FramePages {
    pages: [FrameBuffer; 2],
    front: usize,
}

impl FramePages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn front(&self) -> &FrameBuffer {
        &self.pages[self.front]
    }

    pub fn back_mut(&mut self) -> &mut FrameBuffer {
        &mut self.pages[self.front ^ 1]
    }

    pub fn swap(&mut self) {
        self.front ^= 1;
    }
}
