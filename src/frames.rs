use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::grid::PixelGrid;

/// All JPEG frames under `raw_dir`, sorted by name. ffmpeg writes them as
/// zero-padded `%09d.jpg`, so lexical order is frame order.
pub fn jpg_frames(raw_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.jpg", raw_dir.display());
    let mut paths = vec![];
    for entry in glob::glob(&pattern)? {
        paths.push(entry?);
    }
    Ok(paths.into_iter().sorted().collect())
}

/// Decode one JPEG frame into an RGB pixel grid. Any alpha channel is
/// dropped by the RGB conversion.
pub fn decode_frame(path: &Path) -> Result<PixelGrid> {
    let rgb = image::open(path)
        .with_context(|| format!("failed to decode {}", path.display()))?
        .into_rgb8();
    let (width, height) = rgb.dimensions();
    let pixels = rgb.pixels().map(|p| p.0).collect();
    PixelGrid::new(width as usize, height as usize, pixels)
}
