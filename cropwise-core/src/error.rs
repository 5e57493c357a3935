// ============================================================================
// cropwise-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for Cropwise Core
//
// This module defines the error types used throughout the cropwise-core
// library. It uses the thiserror crate to derive the Error trait, and groups
// errors into contract violations (Busy, InvalidIndex), recovered probe
// failures, and the plumbing errors of driving ffmpeg/ffprobe processes.
//
// KEY COMPONENTS:
// - CoreError: Enum of all possible errors
// - CoreResult: Type alias for Result with CoreError
// - Helper functions for creating command errors
//
// AI-ASSISTANT-INFO: Error handling system for cropwise-core

use std::fmt;
use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// The kind of track an index refers to, used to give `InvalidIndex` context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Subtitle,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Video => f.write_str("video"),
            TrackKind::Subtitle => f.write_str("subtitle"),
        }
    }
}

/// Errors produced by the cropwise-core library.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A long-running operation already holds the session's exclusive token.
    #[error("Another detection or encode is already in progress")]
    Busy,

    /// The prober returned an error or could not be reached.
    #[error("Probe failed: {0}")]
    ProbeFailed(String),

    #[error("Invalid {kind} track index {index} ({available} selectable)")]
    InvalidIndex {
        kind: TrackKind,
        index: usize,
        available: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("Failed to wait for command '{0}': {1}")]
    CommandWait(String, io::Error),

    #[error("Command '{cmd}' failed with status {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("ffprobe output parsing error: {0}")]
    FfprobeParse(String),

    #[error("Video info error: {0}")]
    VideoInfo(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// True for failures that a detection job recovers from locally.
    #[must_use]
    pub fn is_probe_failure(&self) -> bool {
        matches!(self, CoreError::ProbeFailed(_))
    }

    /// Collapses any error raised while probing into `ProbeFailed`.
    ///
    /// Contract violations pass through untouched so they still reach the caller
    /// as what they are.
    #[must_use]
    pub fn into_probe_failure(self) -> CoreError {
        match self {
            CoreError::ProbeFailed(_) | CoreError::Busy | CoreError::InvalidIndex { .. } => self,
            other => CoreError::ProbeFailed(other.to_string()),
        }
    }
}

/// Result type for cropwise-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

// ---- Helper functions for creating command errors ----

pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}
