//! Interlace and crop detection jobs.
//!
//! A detection job asks the prober one question about one video track. At
//! most one job runs per editing session; the exclusive token it holds is the
//! same one an encode would take, so the two can never overlap.

pub mod controller;
pub mod exclusive;

pub use controller::DetectionController;
pub use exclusive::{ExclusiveToken, OperationGuard};

use crate::error::{CoreError, CoreResult};
use crate::params::CropBox;
use std::fmt;

/// What a detection job asks the prober.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionKind {
    Interlace,
    Crop,
}

impl DetectionKind {
    /// Name used for the exclusive token and in log messages.
    #[must_use]
    pub fn operation_name(&self) -> &'static str {
        match self {
            DetectionKind::Interlace => "interlace detection",
            DetectionKind::Crop => "crop detection",
        }
    }
}

impl fmt::Display for DetectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation_name())
    }
}

/// A single probe request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionJob {
    pub kind: DetectionKind,
    pub track_index: usize,
    /// Position in the source to start analyzing from, in seconds
    pub start_secs: f64,
}

impl DetectionJob {
    #[must_use]
    pub fn interlace(track_index: usize, start_secs: f64) -> Self {
        Self {
            kind: DetectionKind::Interlace,
            track_index,
            start_secs,
        }
    }

    #[must_use]
    pub fn crop(track_index: usize, start_secs: f64) -> Self {
        Self {
            kind: DetectionKind::Crop,
            track_index,
            start_secs,
        }
    }
}

/// What a finished job did to the parameters.
#[derive(Debug)]
pub enum DetectionOutcome {
    /// The deinterlace flag was set to this value.
    Interlaced(bool),
    /// The crop box was replaced with this (normalized) value.
    Cropped(CropBox),
    /// The probe failed; no parameter changed.
    Failed(CoreError),
}

/// Reported once per job, after its outcome has been applied and the
/// exclusive token released.
#[derive(Debug)]
pub struct DetectionEvent {
    pub job: DetectionJob,
    pub outcome: DetectionOutcome,
}

impl DetectionEvent {
    /// True when the crop changed and crop-dependent display should refresh.
    #[must_use]
    pub fn crop_changed(&self) -> bool {
        matches!(self.outcome, DetectionOutcome::Cropped(_))
    }

    /// The interlace answer, or the failure that replaced it.
    pub fn into_interlace_result(self) -> CoreResult<bool> {
        match self.outcome {
            DetectionOutcome::Interlaced(value) => Ok(value),
            DetectionOutcome::Failed(err) => Err(err),
            DetectionOutcome::Cropped(_) => Err(CoreError::ProbeFailed(format!(
                "expected an interlace result, got a crop result for {}",
                self.job.kind
            ))),
        }
    }

    /// The stored crop, or the failure that replaced it.
    pub fn into_crop_result(self) -> CoreResult<CropBox> {
        match self.outcome {
            DetectionOutcome::Cropped(crop) => Ok(crop),
            DetectionOutcome::Failed(err) => Err(err),
            DetectionOutcome::Interlaced(_) => Err(CoreError::ProbeFailed(format!(
                "expected a crop result, got an interlace result for {}",
                self.job.kind
            ))),
        }
    }
}
