//! Core library for preparing a video source for encoding.
//!
//! This crate probes a source for interlacing and black borders with ffmpeg,
//! keeps the resulting encode parameters (crop, scale, deinterlace, sample
//! aspect ratio correction) consistent, and resolves which subtitle track, if
//! any, is burned into the output.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use cropwise_core::{DetectionConfig, EditingSession, FfmpegProber, TagLanguageResolver};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let config = DetectionConfig::default().with_env_overrides();
//! config.validate().unwrap();
//!
//! let source = cropwise_core::load_source(Path::new("/path/to/movie.mkv")).unwrap();
//! let mut session = EditingSession::new(source, Arc::new(FfmpegProber::new(config)));
//!
//! session.request_crop_detection(0, 120.0).unwrap();
//! session.subtitles_mut().set_burn(true);
//!
//! let snapshot = session.snapshot(&TagLanguageResolver);
//! println!("{}", serde_json::to_string_pretty(&snapshot).unwrap());
//! ```

pub mod config;
pub mod detection;
pub mod error;
pub mod external;
pub mod media;
pub mod params;
pub mod session;
pub mod subtitles;

// Re-exports for public API
pub use config::DetectionConfig;
pub use detection::{
    DetectionEvent, DetectionJob, DetectionKind, DetectionOutcome, ExclusiveToken, OperationGuard,
};
pub use error::{CoreError, CoreResult, TrackKind};
pub use external::{CropArea, FfmpegProber, Prober};
pub use media::{SampleAspectRatio, Source, SubtitleTrack, VideoTrack, load_source};
pub use params::{AnamorphicState, CropBox, CropField, ParameterStore, ScaleBox, ScaleField};
pub use session::{EditingSession, ParameterSnapshot, SubtitleSnapshot};
pub use subtitles::{
    BurnSource, LanguageResolver, SUBTITLE_EXTENSIONS, SubtitleChoice, SubtitlePicker,
    SubtitleResolver, TagLanguageResolver, TrackOption, is_subtitle_file,
};
