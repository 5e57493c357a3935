//! Source media model.
//!
//! A `Source` is the read-only description of the file being edited: its
//! path, its video tracks and its embedded subtitle tracks. It is built once
//! per editing session (usually by [`crate::media::load_source`]) and shared
//! behind an `Arc` by everything that needs it.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Pixel (sample) aspect ratio of a video track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleAspectRatio {
    pub num: u32,
    pub den: u32,
}

impl SampleAspectRatio {
    pub const SQUARE: SampleAspectRatio = SampleAspectRatio { num: 1, den: 1 };

    #[must_use]
    pub fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Parses ffprobe's `N:D` notation.
    ///
    /// ffprobe reports `0:1` when the container carries no ratio; that and
    /// any other zero term is treated as square.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (num, den) = value.trim().split_once(':')?;
        let num: u32 = num.trim().parse().ok()?;
        let den: u32 = den.trim().parse().ok()?;
        if num == 0 || den == 0 {
            return Some(Self::SQUARE);
        }
        Some(Self { num, den })
    }

    #[must_use]
    pub fn is_square(&self) -> bool {
        self.num == 0 || self.den == 0 || self.num == self.den
    }
}

impl Default for SampleAspectRatio {
    fn default() -> Self {
        Self::SQUARE
    }
}

/// One video stream of the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoTrack {
    pub width: u32,
    pub height: u32,
    pub sample_aspect_ratio: SampleAspectRatio,
}

impl VideoTrack {
    /// A track with square pixels.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            sample_aspect_ratio: SampleAspectRatio::SQUARE,
        }
    }

    #[must_use]
    pub fn with_sample_aspect_ratio(mut self, sar: SampleAspectRatio) -> Self {
        self.sample_aspect_ratio = sar;
        self
    }

    #[must_use]
    pub fn is_anamorphic(&self) -> bool {
        !self.sample_aspect_ratio.is_square()
    }

    /// Option label for a track selector, e.g. `#0 (1920x1080)`.
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        format!("#{index} ({}x{})", self.width, self.height)
    }
}

/// One embedded subtitle stream of the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleTrack {
    /// Codec identifier as reported by ffprobe (e.g. `ass`, `subrip`)
    pub codec: String,
    /// Raw language tag, if the container has one
    pub language: Option<String>,
}

impl SubtitleTrack {
    #[must_use]
    pub fn new(codec: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            codec: codec.into(),
            language: language.map(str::to_string),
        }
    }
}

/// A probed media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub path: PathBuf,
    pub video_tracks: Vec<VideoTrack>,
    pub subtitle_tracks: Vec<SubtitleTrack>,
}

impl Source {
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        video_tracks: Vec<VideoTrack>,
        subtitle_tracks: Vec<SubtitleTrack>,
    ) -> Self {
        Self {
            path: path.into(),
            video_tracks,
            subtitle_tracks,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn video_track(&self, index: usize) -> Option<&VideoTrack> {
        self.video_tracks.get(index)
    }
}
