//! Prober capability and its ffmpeg-backed implementation.
//!
//! A prober answers two questions about a video track starting at a given
//! timestamp: is it interlaced, and where are its black borders. The
//! detection controller only depends on the [`Prober`] trait, so a session
//! can be driven by [`FfmpegProber`] in production and by scripted mocks in
//! tests.

use crate::config::DetectionConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg_executor::{FfmpegSpawner, SidecarSpawner, run_analysis};
use ffmpeg_sidecar::command::FfmpegCommand;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Raw crop rectangle reported by a prober.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CropArea {
    pub width: u32,
    pub height: u32,
    pub left: u32,
    pub top: u32,
}

impl CropArea {
    #[must_use]
    pub fn new(width: u32, height: u32, left: u32, top: u32) -> Self {
        Self {
            width,
            height,
            left,
            top,
        }
    }

    /// Parses cropdetect's `w:h:x:y` notation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let parts: Vec<&str> = value.split(':').collect();
        if parts.len() != 4 {
            return None;
        }
        let mut numbers = [0u32; 4];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part.parse().ok()?;
        }
        Some(Self::new(numbers[0], numbers[1], numbers[2], numbers[3]))
    }
}

/// Capability that analyzes decoded frames of a source.
///
/// Calls may take arbitrarily long; the detection controller runs them off
/// the session's thread.
pub trait Prober: Send + Sync {
    /// Reports whether the track is interlaced around `start_secs`.
    fn detect_interlace(&self, source: &Path, track_index: usize, start_secs: f64) -> CoreResult<bool>;

    /// Reports the non-black area of the track around `start_secs`.
    fn detect_crop_area(&self, source: &Path, track_index: usize, start_secs: f64) -> CoreResult<CropArea>;
}

/// Frame counts from the idet filter's multi-frame summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdetCounts {
    pub tff: u64,
    pub bff: u64,
    pub progressive: u64,
    pub undetermined: u64,
}

impl IdetCounts {
    /// Interlaced when TFF+BFF frames make up at least `ratio` of the frames
    /// idet could classify. Undetermined frames are not counted.
    #[must_use]
    pub fn is_interlaced(&self, ratio: f32) -> bool {
        let interlaced = self.tff + self.bff;
        let classified = interlaced + self.progressive;
        if classified == 0 {
            return false;
        }
        interlaced as f64 / classified as f64 >= f64::from(ratio)
    }
}

/// Prober implemented with ffmpeg's `cropdetect` and `idet` filters.
pub struct FfmpegProber<S = SidecarSpawner> {
    spawner: S,
    config: DetectionConfig,
}

impl FfmpegProber<SidecarSpawner> {
    #[must_use]
    pub fn new(config: DetectionConfig) -> Self {
        Self::with_spawner(SidecarSpawner, config)
    }
}

impl<S: FfmpegSpawner> FfmpegProber<S> {
    #[must_use]
    pub fn with_spawner(spawner: S, config: DetectionConfig) -> Self {
        Self { spawner, config }
    }

    #[must_use]
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Seek, input and stream mapping shared by both analyses.
    fn base_command(&self, source: &Path, track_index: usize, start_secs: f64, frames: u32) -> FfmpegCommand {
        let mut cmd = FfmpegCommand::new();
        if self.config.hardware_decoding {
            cmd.args(["-hwaccel", "auto"]);
        }
        let start = if start_secs.is_finite() { start_secs.max(0.0) } else { 0.0 };
        cmd.args(["-ss", &format!("{start:.3}")]);
        cmd.input(source.to_string_lossy().as_ref());
        cmd.args(["-map", &format!("0:v:{track_index}")]);
        cmd.args(["-frames:v", &frames.to_string()]);
        cmd.args(["-an", "-sn"]);
        cmd
    }
}

impl<S> Prober for FfmpegProber<S>
where
    S: FfmpegSpawner + Send + Sync,
{
    fn detect_interlace(&self, source: &Path, track_index: usize, start_secs: f64) -> CoreResult<bool> {
        let mut cmd = self.base_command(source, track_index, start_secs, self.config.interlace_frames);
        cmd.args(["-vf", "idet", "-f", "null", "-"]);

        let lines = run_analysis(&self.spawner, cmd, "idet", |line| {
            line.contains("Multi frame detection:")
        })?;

        let counts = parse_idet_summary(&lines).ok_or_else(|| {
            CoreError::ProbeFailed(format!(
                "idet produced no frame summary for {}",
                source.display()
            ))
        })?;
        let interlaced = counts.is_interlaced(self.config.interlace_ratio);
        log::debug!(
            "idet on {} track {}: {:?} -> interlaced={}",
            source.display(),
            track_index,
            counts,
            interlaced
        );
        Ok(interlaced)
    }

    fn detect_crop_area(&self, source: &Path, track_index: usize, start_secs: f64) -> CoreResult<CropArea> {
        let mut cmd = self.base_command(source, track_index, start_secs, self.config.crop_frames);
        let filter = format!(
            "cropdetect=limit={}:round={}:reset=0",
            self.config.crop_limit, self.config.crop_round
        );
        cmd.args(["-vf", filter.as_str(), "-f", "null", "-"]);

        let lines = run_analysis(&self.spawner, cmd, "cropdetect", |line| line.contains("crop="))?;

        parse_crop_lines(&lines).ok_or_else(|| {
            CoreError::ProbeFailed(format!(
                "cropdetect reported no crop values for {}",
                source.display()
            ))
        })
    }
}

/// Picks the most common `crop=w:h:x:y` value from cropdetect output.
///
/// Malformed values and empty areas (zero width or height, as reported for
/// all-black frames) are ignored. Ties go to the value seen last, since
/// cropdetect without reset narrows its estimate as frames accumulate.
pub fn parse_crop_lines<L: AsRef<str>>(lines: &[L]) -> Option<CropArea> {
    let mut counts: HashMap<CropArea, (usize, usize)> = HashMap::new();

    for (position, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let Some(crop_pos) = line.find("crop=") else {
            continue;
        };
        let crop_part = &line[crop_pos + 5..];
        let end_pos = crop_part
            .find(|c: char| c.is_whitespace())
            .unwrap_or(crop_part.len());

        let area = CropArea::parse(&crop_part[..end_pos]).filter(|a| a.width > 0 && a.height > 0);
        if let Some(area) = area {
            let entry = counts.entry(area).or_insert((0, position));
            entry.0 += 1;
            entry.1 = position;
        }
    }

    counts
        .into_iter()
        .max_by_key(|&(_, (count, last_seen))| (count, last_seen))
        .map(|(area, _)| area)
}

/// Extracts the last `Multi frame detection:` summary from idet output.
pub fn parse_idet_summary<L: AsRef<str>>(lines: &[L]) -> Option<IdetCounts> {
    lines.iter().rev().find_map(|line| {
        let line = line.as_ref();
        let summary = &line[line.find("Multi frame detection:")?..];
        Some(IdetCounts {
            tff: idet_field(summary, "TFF:")?,
            bff: idet_field(summary, "BFF:")?,
            progressive: idet_field(summary, "Progressive:")?,
            undetermined: idet_field(summary, "Undetermined:").unwrap_or(0),
        })
    })
}

fn idet_field(summary: &str, label: &str) -> Option<u64> {
    let rest = &summary[summary.find(label)? + label.len()..];
    rest.split_whitespace().next()?.parse().ok()
}
