// ============================================================================
// cropwise-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with FFmpeg and the Prober Capability
//
// This module encapsulates everything that talks to a separate process. The
// detection controller depends only on the Prober trait; the ffmpeg-backed
// prober depends only on the FfmpegSpawner trait. Both seams can be filled
// with the mocks in `mocks` for testing.
//
// KEY COMPONENTS:
// - Prober: capability answering interlace and crop questions
// - FfmpegProber: Prober built on ffmpeg's cropdetect and idet filters
// - FfmpegSpawner / FfmpegProcess: process seam with a sidecar implementation
//
// AI-ASSISTANT-INFO: External tool interactions and abstractions for ffmpeg

// ============================================================================
// SUBMODULES
// ============================================================================

/// Traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Prober capability and the ffmpeg-backed prober
pub mod prober;

/// Scripted stand-ins for the prober and ffmpeg spawner
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use prober::{CropArea, FfmpegProber, IdetCounts, Prober};
