//! Configuration structures and constants for the cropwise-core library.
//!
//! `DetectionConfig` tunes how the ffmpeg-backed prober analyzes a source.
//! Values come from defaults, an optional JSON file, and `CROPWISE_*`
//! environment overrides, in that order.

mod utils;

pub use utils::env_lookup;

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use utils::{get_env_bool, get_env_f32, get_env_u32};

// Default constants

/// Default cropdetect black threshold (0-255 for 8-bit content).
pub const DEFAULT_CROP_LIMIT: u32 = 24;

/// Default cropdetect rounding. Dimensions are rounded to a multiple of this.
pub const DEFAULT_CROP_ROUND: u32 = 2;

/// Default number of frames analyzed by cropdetect.
pub const DEFAULT_CROP_FRAMES: u32 = 60;

/// Default number of frames analyzed by the idet filter.
pub const DEFAULT_INTERLACE_FRAMES: u32 = 200;

/// Default share of classified frames that must be interlaced.
pub const DEFAULT_INTERLACE_RATIO: f32 = 0.5;

/// Tuning for the ffmpeg-backed prober.
///
/// # Examples
///
/// ```rust
/// use cropwise_core::config::DetectionConfig;
///
/// let config = DetectionConfig::default();
/// assert_eq!(config.crop_round, 2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Black threshold passed to cropdetect
    pub crop_limit: u32,

    /// Rounding passed to cropdetect
    pub crop_round: u32,

    /// Frames decoded for crop detection
    pub crop_frames: u32,

    /// Frames decoded for interlace detection
    pub interlace_frames: u32,

    /// Fraction (0, 1] of classified frames that must be TFF or BFF for the
    /// source to count as interlaced
    pub interlace_ratio: f32,

    /// Whether to ask ffmpeg for hardware decoding while probing
    pub hardware_decoding: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            crop_limit: DEFAULT_CROP_LIMIT,
            crop_round: DEFAULT_CROP_ROUND,
            crop_frames: DEFAULT_CROP_FRAMES,
            interlace_frames: DEFAULT_INTERLACE_FRAMES,
            interlace_ratio: DEFAULT_INTERLACE_RATIO,
            hardware_decoding: false,
        }
    }
}

impl DetectionConfig {
    /// Loads a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config: DetectionConfig = serde_json::from_str(&contents)?;
        log::debug!("Loaded detection config from {}", path.display());
        Ok(config)
    }

    /// Applies `CROPWISE_*` overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(env_lookup)
    }

    /// Applies `CROPWISE_*` overrides read through `lookup`.
    #[must_use]
    pub fn with_overrides_from<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            crop_limit: get_env_u32(&lookup, "CROPWISE_CROP_LIMIT", self.crop_limit),
            crop_round: get_env_u32(&lookup, "CROPWISE_CROP_ROUND", self.crop_round),
            crop_frames: get_env_u32(&lookup, "CROPWISE_CROP_FRAMES", self.crop_frames),
            interlace_frames: get_env_u32(&lookup, "CROPWISE_INTERLACE_FRAMES", self.interlace_frames),
            interlace_ratio: get_env_f32(&lookup, "CROPWISE_INTERLACE_RATIO", self.interlace_ratio),
            hardware_decoding: get_env_bool(&lookup, "CROPWISE_HWDEC", self.hardware_decoding),
        }
    }

    /// Checks that every value is usable by the prober.
    pub fn validate(&self) -> CoreResult<()> {
        if self.crop_round == 0 {
            return Err(CoreError::Config("crop_round must be at least 1".to_string()));
        }
        if self.crop_frames == 0 {
            return Err(CoreError::Config("crop_frames must be at least 1".to_string()));
        }
        if self.interlace_frames == 0 {
            return Err(CoreError::Config("interlace_frames must be at least 1".to_string()));
        }
        if !(self.interlace_ratio > 0.0 && self.interlace_ratio <= 1.0) {
            return Err(CoreError::Config(format!(
                "interlace_ratio must be in (0, 1], got {}",
                self.interlace_ratio
            )));
        }
        Ok(())
    }
}
