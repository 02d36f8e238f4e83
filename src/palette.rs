use hashbrown::HashMap;

use crate::color::{Color, ColorRGB};
use crate::grid::{IndexGrid, PixelGrid};

pub const PALETTE_SIZE: usize = 16;

// The 16 PICO-8 system colors, in palette order. Index 0 is black.
const PICO8_RGB: [ColorRGB; PALETTE_SIZE] = [
    [0, 0, 0],       // 0: black
    [29, 43, 83],    // 1: dark blue
    [126, 37, 83],   // 2: dark purple
    [0, 135, 81],    // 3: dark green
    [171, 82, 54],   // 4: brown
    [95, 87, 79],    // 5: dark gray
    [194, 195, 199], // 6: light gray
    [255, 241, 232], // 7: white
    [255, 0, 77],    // 8: red
    [255, 163, 0],   // 9: orange
    [255, 236, 39],  // 10: yellow
    [0, 228, 54],    // 11: green
    [41, 173, 255],  // 12: blue
    [131, 118, 156], // 13: lavender
    [255, 119, 168], // 14: pink
    [255, 204, 170], // 15: peach
];

/// The fixed PICO-8 palette with HSL precomputed for every entry.
/// Built once at startup and shared read-only from there on.
pub struct Palette {
    colors: [Color; PALETTE_SIZE],
}

impl Palette {
    pub fn pico8() -> Self {
        Palette {
            colors: PICO8_RGB.map(Color::from_rgb),
        }
    }

    pub fn colors(&self) -> &[Color; PALETTE_SIZE] {
        &self.colors
    }

    /// Index of the palette entry closest to `color` under the HSL metric.
    /// Ties keep the lower index, so an exact palette color always maps
    /// to its own slot.
    pub fn nearest(&self, color: &Color) -> u8 {
        let mut best_idx = 0u8;
        let mut best_distance = f64::MAX;
        for (idx, candidate) in self.colors.iter().enumerate() {
            let distance = candidate.hsl_distance(color);
            if distance < best_distance {
                best_distance = distance;
                best_idx = idx as u8;
            }
        }
        best_idx
    }
}

/// Maps frame pixels onto palette indices, memoizing by RGB value so the
/// HSL conversion and the 16-way scan run once per distinct color rather
/// than once per pixel.
pub struct Quantizer<'a> {
    palette: &'a Palette,
    cache: HashMap<ColorRGB, u8>,
}

impl<'a> Quantizer<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Quantizer {
            palette,
            cache: HashMap::new(),
        }
    }

    pub fn index_for(&mut self, rgb: ColorRGB) -> u8 {
        if let Some(&idx) = self.cache.get(&rgb) {
            return idx;
        }
        let idx = self.palette.nearest(&Color::from_rgb(rgb));
        self.cache.insert(rgb, idx);
        idx
    }

    pub fn quantize(&mut self, frame: &PixelGrid) -> IndexGrid {
        let cells: Vec<u8> = frame.pixels().iter().map(|&rgb| self.index_for(rgb)).collect();
        IndexGrid::new(frame.width(), frame.height(), cells)
            .expect("quantized grid inherits validated frame dimensions")
    }
}
