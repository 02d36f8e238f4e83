use anyhow::{ensure, Result};

use crate::color::ColorRGB;

// Frames are stored row-major. Dimension checks happen once at construction;
// everything downstream can index without revalidating.

pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<ColorRGB>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize, pixels: Vec<ColorRGB>) -> Result<Self> {
        ensure!(width > 0 && height > 0, "grid dimensions must be positive");
        ensure!(
            pixels.len() == width * height,
            "pixel buffer holds {} entries, expected {}x{} = {}",
            pixels.len(),
            width,
            height,
            width * height
        );
        Ok(PixelGrid {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixels in row-major scan order.
    pub fn pixels(&self) -> &[ColorRGB] {
        &self.pixels
    }
}

pub struct IndexGrid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl IndexGrid {
    pub fn new(width: usize, height: usize, cells: Vec<u8>) -> Result<Self> {
        ensure!(width > 0 && height > 0, "grid dimensions must be positive");
        ensure!(
            cells.len() == width * height,
            "index buffer holds {} entries, expected {}x{} = {}",
            cells.len(),
            width,
            height,
            width * height
        );
        ensure!(
            cells.iter().all(|&c| c < 16),
            "palette index out of range (must be 0-15)"
        );
        Ok(IndexGrid {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Palette indices in row-major scan order, each in 0-15.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}
