use std::fmt::Write;

use itertools::Itertools;

use crate::grid::IndexGrid;

// A __gfx__ line covers one 128-pixel raster row at 4bpp: 64 bytes,
// rendered as 128 lowercase hex digits. PICO-8 expects the section to
// span a whole number of 8-line sprite rows.
pub const BYTES_PER_LINE: usize = 64;
pub const CHARS_PER_LINE: usize = 2 * BYTES_PER_LINE;
pub const LINES_PER_GROUP: usize = 8;

pub const CART_HEADER: &str = "pico-8 cartridge // http://www.pico-8.com";
pub const CART_VERSION: &str = "version 42";
pub const GFX_TAG: &str = "__gfx__";

/// Pack two 4-bit palette indices per byte, first pixel in the low nibble.
/// This matches how PICO-8 lays out two pixels per byte in gfx RAM; an odd
/// trailing pixel gets a zero high nibble.
pub fn pack_indices(cells: &[u8]) -> Vec<u8> {
    cells
        .chunks(2)
        .map(|pair| {
            let first = pair[0];
            let second = pair.get(1).copied().unwrap_or(0);
            second << 4 | first
        })
        .collect()
}

/// Inverse of `pack_indices` for a single byte: (low nibble, high nibble).
pub fn unpack_byte(byte: u8) -> (u8, u8) {
    (byte & 0xF, byte >> 4)
}

/// Render an index grid as __gfx__ data lines: 128 hex chars each, the
/// last data line zero-padded, then all-zero lines appended until the
/// count is a multiple of 8.
pub fn gfx_lines(indices: &IndexGrid) -> Vec<String> {
    let bytes = pack_indices(indices.cells());

    let mut lines: Vec<String> = bytes
        .chunks(BYTES_PER_LINE)
        .map(|chunk| {
            let mut line = String::with_capacity(CHARS_PER_LINE);
            for byte in chunk {
                write!(line, "{:02x}", byte).expect("writing to a String cannot fail");
            }
            // Short final chunk: pad the line out with zero pixels.
            while line.len() < CHARS_PER_LINE {
                line.push('0');
            }
            line
        })
        .collect();

    while lines.len() % LINES_PER_GROUP != 0 {
        lines.push("0".repeat(CHARS_PER_LINE));
    }
    lines
}

/// Full cartridge text for one frame: container header, version, section
/// tag, then the data lines.
pub fn gfx_cart(indices: &IndexGrid) -> String {
    let mut out = format!("{}\n{}\n{}\n", CART_HEADER, CART_VERSION, GFX_TAG);
    out.push_str(&gfx_lines(indices).iter().join("\n"));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::PixelGrid;
    use crate::palette::{Palette, Quantizer};

    fn grid(width: usize, height: usize, cells: Vec<u8>) -> IndexGrid {
        IndexGrid::new(width, height, cells).unwrap()
    }

    #[test]
    fn packing_puts_first_pixel_in_low_nibble() {
        assert_eq!(pack_indices(&[3, 5]), vec![0x53]);
        assert_eq!(unpack_byte(0x53), (3, 5));
    }

    #[test]
    fn odd_pixel_count_pads_high_nibble() {
        assert_eq!(pack_indices(&[0xF]), vec![0x0F]);
    }

    #[test]
    fn lines_are_128_hex_chars_in_groups_of_8() {
        for (w, h) in [(2, 1), (128, 3), (128, 128), (17, 9)] {
            let lines = gfx_lines(&grid(w, h, vec![0; w * h]));
            assert_eq!(lines.len() % LINES_PER_GROUP, 0, "{}x{}", w, h);
            assert!(!lines.is_empty());
            for line in &lines {
                assert_eq!(line.len(), CHARS_PER_LINE);
                assert!(line.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
            }
        }
    }

    #[test]
    fn full_frame_is_not_padded_further() {
        // 128x128 pixels fill exactly 64 data lines, already a multiple of 8.
        let lines = gfx_lines(&grid(128, 128, vec![15; 128 * 128]));
        assert_eq!(lines.len(), 64);
        assert!(lines.iter().all(|l| l == &"f".repeat(CHARS_PER_LINE)));
    }

    #[test]
    fn two_pixel_frame_end_to_end() {
        // Black and white quantize to indices 0 and 7, pack to one byte
        // (0x70), and pad out to a full 8-line group.
        let palette = Palette::pico8();
        let mut quantizer = Quantizer::new(&palette);
        let frame = PixelGrid::new(2, 1, vec![[0, 0, 0], [255, 241, 232]]).unwrap();
        let indices = quantizer.quantize(&frame);
        assert_eq!(indices.cells(), &[0, 7]);

        let lines = gfx_lines(&indices);
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], format!("70{}", "0".repeat(126)));
        for line in &lines[1..] {
            assert_eq!(line, &"0".repeat(CHARS_PER_LINE));
        }
    }

    #[test]
    fn cart_framing_is_exact() {
        let cart = gfx_cart(&grid(2, 1, vec![1, 2]));
        let mut lines = cart.lines();
        assert_eq!(lines.next(), Some("pico-8 cartridge // http://www.pico-8.com"));
        assert_eq!(lines.next(), Some("version 42"));
        assert_eq!(lines.next(), Some("__gfx__"));
        let data: Vec<&str> = lines.collect();
        assert_eq!(data.len(), 8);
        assert_eq!(data[0], format!("21{}", "0".repeat(126)));
    }
}
