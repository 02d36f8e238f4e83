use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use log::{error, info};

use p8video::ffmpeg::{self, FfmpegSettings};
use p8video::palette::{Palette, Quantizer};
use p8video::{config, frames, gfx, player};

/// Converts a video into PICO-8 cartridges: one gfx cart per frame, plus a
/// player cart that streams them back at speed.
#[derive(Parser, Debug)]
#[command(name = "p8video")]
struct Args {
    /// Input video file
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Run the player cartridge after conversion (requires pico8 on PATH)
    #[arg(long)]
    autorun: bool,

    /// Number of worker threads converting frames
    #[arg(short, long, default_value_t = 8)]
    workers: usize,

    /// Load frame-extraction settings from a JSON preset file
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Write the effective frame-extraction settings to a JSON preset file
    #[arg(long)]
    write_preset: Option<PathBuf>,

    /// Frames per second to sample from the video
    #[arg(long)]
    fps: Option<f32>,

    /// Quantize in ffmpeg against the PICO-8 palette before extraction
    #[arg(long)]
    use_palette: bool,

    /// Dither when quantizing in ffmpeg (only with --use-palette)
    #[arg(long)]
    use_palette_dither: bool,

    /// Crop X
    #[arg(long)]
    cx: Option<i64>,

    /// Crop Y
    #[arg(long)]
    cy: Option<i64>,

    /// Crop width
    #[arg(long)]
    cw: Option<i64>,

    /// Crop height
    #[arg(long)]
    ch: Option<i64>,

    /// Brightness adjustment (-1.0 to 1.0)
    #[arg(long)]
    brightness: Option<f32>,

    /// Contrast adjustment
    #[arg(long)]
    contrast: Option<f32>,

    /// Cut start timestamp in seconds
    #[arg(long)]
    cut_start: Option<i64>,

    /// Cut end timestamp in seconds
    #[arg(long)]
    cut_end: Option<i64>,
}

impl Args {
    /// Layer CLI flags over the preset (or default) settings.
    fn settings(&self) -> Result<FfmpegSettings> {
        let mut settings = match &self.preset {
            Some(path) => config::load_preset(path)?,
            None => FfmpegSettings::default(),
        };
        if let Some(fps) = self.fps {
            settings.fps = fps;
        }
        if self.use_palette {
            settings.use_palette = true;
        }
        if self.use_palette_dither {
            settings.use_palette_dither = true;
        }
        if let Some(cx) = self.cx {
            settings.crop_x = cx;
        }
        if let Some(cy) = self.cy {
            settings.crop_y = cy;
        }
        if let Some(cw) = self.cw {
            settings.crop_width = cw;
        }
        if let Some(ch) = self.ch {
            settings.crop_height = ch;
        }
        if let Some(brightness) = self.brightness {
            settings.brightness = brightness;
        }
        if let Some(contrast) = self.contrast {
            settings.contrast = contrast;
        }
        if let Some(cut_start) = self.cut_start {
            settings.cut_start = cut_start;
        }
        if let Some(cut_end) = self.cut_end {
            settings.cut_end = cut_end;
        }
        Ok(settings)
    }
}

fn confirm_removal(dir: &Path) -> Result<bool> {
    print!(
        "Output directory {} is not empty. Do you want to REMOVE it? (Y/n) ",
        dir.display()
    );
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.is_empty() || answer.eq_ignore_ascii_case("y"))
}

fn prepare_output_dirs(output: &Path) -> Result<(PathBuf, PathBuf)> {
    let raw_dir = output.join("raw");
    let frames_dir = output.join("frames");

    if raw_dir.exists() || frames_dir.exists() {
        if !confirm_removal(output)? {
            bail!("output directory not empty, aborting");
        }
        for dir in [&raw_dir, &frames_dir] {
            if dir.exists() {
                fs::remove_dir_all(dir)
                    .with_context(|| format!("failed to remove {}", dir.display()))?;
            }
        }
    }

    fs::create_dir_all(&raw_dir)?;
    fs::create_dir_all(&frames_dir)?;
    Ok((raw_dir, frames_dir))
}

struct Job {
    jpg_file: PathBuf,
    index: usize,
}

fn convert_frames(
    palette: &Palette,
    jpg_files: Vec<PathBuf>,
    frames_dir: &Path,
    workers: usize,
) -> Result<()> {
    let total = jpg_files.len();
    let failures = AtomicUsize::new(0);

    let (tx, rx) = crossbeam_channel::unbounded::<Job>();
    for (index, jpg_file) in jpg_files.into_iter().enumerate() {
        tx.send(Job { jpg_file, index })?;
    }
    drop(tx);

    thread::scope(|scope| {
        for _ in 0..workers.max(1) {
            let rx = rx.clone();
            let failures = &failures;
            scope.spawn(move || {
                // The quantization cache persists across frames: consecutive
                // frames tend to repeat the same colors.
                let mut quantizer = Quantizer::new(palette);
                for job in rx.iter() {
                    if let Err(e) = convert_one(&mut quantizer, &job, frames_dir) {
                        error!("Error converting {}: {}", job.jpg_file.display(), e);
                        failures.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });

    let failures = failures.into_inner();
    ensure!(
        failures == 0,
        "{} of {} frames failed to convert",
        failures,
        total
    );
    Ok(())
}

fn convert_one(quantizer: &mut Quantizer, job: &Job, frames_dir: &Path) -> Result<()> {
    info!("Processing {}", job.jpg_file.display());
    let frame = frames::decode_frame(&job.jpg_file)?;
    let cart = gfx::gfx_cart(&quantizer.quantize(&frame));
    let cart_path = frames_dir.join(player::frame_cart_name(job.index));
    fs::write(&cart_path, cart)
        .with_context(|| format!("failed to write {}", cart_path.display()))?;
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    if !ffmpeg::is_ffmpeg_available() {
        bail!("ffmpeg is not installed or not in PATH");
    }

    let settings = args.settings()?;
    if let Some(path) = &args.write_preset {
        config::save_preset(path, &settings)?;
    }

    let (raw_dir, frames_dir) = prepare_output_dirs(&args.output)?;
    let palette = Palette::pico8();

    settings.extract_frames(&args.input, &raw_dir, &palette)?;

    let jpg_files = frames::jpg_frames(&raw_dir)?;
    info!("Extracted {} frames", jpg_files.len());
    if jpg_files.is_empty() {
        bail!("ffmpeg produced no frames");
    }

    player::write_player(&args.output)?;
    convert_frames(&palette, jpg_files, &frames_dir, args.workers)?;

    if args.autorun {
        player::run_player(&args.output)?;
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_frames_reports_failed_frames() {
        let palette = Palette::pico8();
        let missing = vec![
            PathBuf::from("no-such-dir/000000001.jpg"),
            PathBuf::from("no-such-dir/000000002.jpg"),
        ];
        let err = convert_frames(&palette, missing, Path::new("no-such-dir"), 2)
            .expect_err("undecodable frames must fail the run");
        assert!(err.to_string().contains("2 of 2 frames failed"));
    }
}
