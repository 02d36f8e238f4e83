pub mod color;
pub mod config;
pub mod ffmpeg;
pub mod frames;
pub mod gfx;
pub mod grid;
pub mod palette;
pub mod player;

use grid::PixelGrid;
use palette::{Palette, Quantizer};

/// Convert one decoded frame into the full text of a PICO-8 gfx cartridge.
/// Pure and stateless apart from the read-only palette, so callers may run
/// any number of these in parallel.
pub fn frame_to_cart(palette: &Palette, frame: &PixelGrid) -> String {
    let mut quantizer = Quantizer::new(palette);
    gfx::gfx_cart(&quantizer.quantize(frame))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_to_cart_produces_a_framed_section() {
        let palette = Palette::pico8();
        let frame = PixelGrid::new(2, 1, vec![[0, 0, 0], [255, 241, 232]]).unwrap();
        let cart = frame_to_cart(&palette, &frame);
        let lines: Vec<&str> = cart.lines().collect();
        assert_eq!(lines[0], "pico-8 cartridge // http://www.pico-8.com");
        assert_eq!(lines[1], "version 42");
        assert_eq!(lines[2], "__gfx__");
        assert_eq!(lines.len(), 3 + 8);
        assert_eq!(lines[3], format!("70{}", "0".repeat(126)));
    }
}
