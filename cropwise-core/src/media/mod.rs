//! Media source model and probing.
//!
//! This module provides the read-only `Source` description of the file being
//! edited, and the ffprobe-backed loader that builds it.

pub mod probe;
pub mod source;

// Re-export commonly used types
pub use probe::load_source;
pub use source::{SampleAspectRatio, Source, SubtitleTrack, VideoTrack};
