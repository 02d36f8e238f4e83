use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::ffmpeg::FfmpegSettings;

pub fn load_preset(path: &Path) -> Result<FfmpegSettings> {
    info!("Loading preset from {}", path.display());
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let settings = serde_json::from_slice(&data)
        .with_context(|| format!("invalid preset file {}", path.display()))?;
    Ok(settings)
}

pub fn save_preset(path: &Path, settings: &FfmpegSettings) -> Result<()> {
    info!("Saving preset to {}", path.display());
    let data = serde_json::to_vec_pretty(settings)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: FfmpegSettings = serde_json::from_str(r#"{"fps": 30.0}"#).unwrap();
        assert_eq!(settings.fps, 30.0);
        assert_eq!(settings.contrast, 1.0);
        assert!(!settings.use_palette);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let mut settings = FfmpegSettings::default();
        settings.use_palette = true;
        settings.cut_start = 5;
        settings.cut_end = 90;
        let json = serde_json::to_string(&settings).unwrap();
        let back: FfmpegSettings = serde_json::from_str(&json).unwrap();
        assert!(back.use_palette);
        assert_eq!(back.cut_start, 5);
        assert_eq!(back.cut_end, 90);
    }
}
