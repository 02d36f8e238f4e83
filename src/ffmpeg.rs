use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::palette::Palette;

/// Frame-extraction settings, loadable as a JSON preset.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FfmpegSettings {
    pub fps: f32,
    pub use_palette: bool,
    pub use_palette_dither: bool,
    pub crop_x: i64,
    pub crop_y: i64,
    pub crop_width: i64,
    pub crop_height: i64,
    pub brightness: f32,
    pub contrast: f32,
    pub cut_start: i64,
    pub cut_end: i64,
}

impl Default for FfmpegSettings {
    fn default() -> Self {
        FfmpegSettings {
            // Roughly the reload cadence the player cart can sustain.
            fps: 19.89,
            use_palette: false,
            use_palette_dither: false,
            crop_x: 0,
            crop_y: 0,
            crop_width: 0,
            crop_height: 0,
            brightness: 0.0,
            contrast: 1.0,
            cut_start: 0,
            cut_end: 0,
        }
    }
}

pub fn is_ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

impl FfmpegSettings {
    /// Filter graph that scales every frame to 128x128 with black bar
    /// padding, matching PICO-8's screen resolution.
    fn filter_graph(&self) -> String {
        let trim_filter = if self.cut_start >= 0 && self.cut_end > 0 {
            format!(
                "trim={}:{},setpts=PTS-STARTPTS,",
                self.cut_start, self.cut_end
            )
        } else {
            String::new()
        };

        let crop_filter = if self.crop_x >= 0
            && self.crop_y >= 0
            && self.crop_width > 0
            && self.crop_height > 0
        {
            format!(
                ",crop={}:{}:{}:{}",
                self.crop_width, self.crop_height, self.crop_x, self.crop_y
            )
        } else {
            String::new()
        };

        let palette_filter = if self.use_palette {
            if self.use_palette_dither {
                "[vid]; [vid][1:v]paletteuse"
            } else {
                "[vid]; [vid][1:v]paletteuse=dither=none"
            }
        } else {
            ""
        };

        format!(
            "[0:v]{}fps={}{},scale=128:128:force_original_aspect_ratio=decrease,\
             eq=brightness={}:contrast={},pad=128:128:-1:-1:color=black{}",
            trim_filter, self.fps, crop_filter, self.brightness, self.contrast, palette_filter
        )
    }

    /// Run ffmpeg to split `input` into 128x128 JPEG frames under `raw_dir`.
    /// With `use_palette`, a 16-color palette image generated from the
    /// PICO-8 palette is piped in for ffmpeg's paletteuse filter.
    pub fn extract_frames(&self, input: &Path, raw_dir: &Path, palette: &Palette) -> Result<()> {
        let filters = self.filter_graph();
        debug!("ffmpeg filter graph: {}", filters);

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-i").arg(input);
        if self.use_palette {
            cmd.arg("-i").arg("-");
        }
        cmd.arg("-filter_complex")
            .arg(&filters)
            .arg(raw_dir.join("%09d.jpg"))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if self.use_palette {
            cmd.stdin(Stdio::piped());
        }

        info!("Extracting frames from {}", input.display());
        let mut child = cmd.spawn().context("failed to spawn ffmpeg")?;

        if self.use_palette {
            let png = palette_png(palette)?;
            child
                .stdin
                .take()
                .context("ffmpeg stdin not captured")?
                .write_all(&png)?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            bail!(
                "ffmpeg failed ({}):\n{}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Ok(())
    }
}

/// Encode the palette as a 16x16 RGBA PNG for ffmpeg's paletteuse filter,
/// which rejects any palette input that is not exactly 256 pixels. Row y
/// holds palette entry y replicated across the row.
pub fn palette_png(palette: &Palette) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(256 * 4);
    for color in palette.colors() {
        for _ in 0..16 {
            data.extend_from_slice(&[color.red, color.green, color.blue, 255]);
        }
    }

    let mut png_bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_bytes, 16, 16);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&data)?;
    }
    Ok(png_bytes)
}
