//! Editing session: one source, its parameters, and its detection jobs.
//!
//! The session is the owner the rest of the crate assumes: it holds the
//! `ParameterStore` and `SubtitleResolver`, the `DetectionController`, and
//! the exclusive token shared between detection and encoding. All access is
//! sequential through `&mut self`; only the prober runs elsewhere.
//!
//! ```rust,no_run
//! use cropwise_core::config::DetectionConfig;
//! use cropwise_core::external::FfmpegProber;
//! use cropwise_core::session::EditingSession;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let source = cropwise_core::media::load_source(Path::new("movie.mkv")).unwrap();
//! let prober = Arc::new(FfmpegProber::new(DetectionConfig::default()));
//! let mut session = EditingSession::new(source, prober);
//!
//! let deinterlace = session.request_interlace_detection(0, 60.0).unwrap();
//! let crop = session.request_crop_detection(0, 60.0).unwrap();
//! println!("deinterlace={deinterlace} crop={crop:?}");
//! ```

use crate::detection::{DetectionController, DetectionEvent, DetectionJob, ExclusiveToken, OperationGuard};
use crate::error::CoreResult;
use crate::external::Prober;
use crate::media::Source;
use crate::params::{AnamorphicState, CropBox, ParameterStore, ScaleBox};
use crate::subtitles::{LanguageResolver, SubtitleResolver, TrackOption};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a presentation layer reads, captured at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSnapshot {
    pub source: PathBuf,
    pub video_track: usize,
    pub video_track_options: Vec<TrackOption>,
    pub crop: CropBox,
    pub scale: ScaleBox,
    pub anamorphic: AnamorphicState,
    pub fix_sar: bool,
    pub effective_fix_sar: bool,
    pub deinterlace: bool,
    pub subtitles: SubtitleSnapshot,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleSnapshot {
    pub options: Vec<TrackOption>,
    pub selected: Option<usize>,
    pub external_path: Option<PathBuf>,
    pub can_burn: bool,
    pub burn: bool,
}

/// State of one source being prepared for encoding.
pub struct EditingSession {
    source: Arc<Source>,
    params: ParameterStore,
    subtitles: SubtitleResolver,
    detection: DetectionController,
    token: ExclusiveToken,
}

impl EditingSession {
    /// Starts a session with default parameters. `prober` is used for every
    /// detection job of this session.
    pub fn new(source: impl Into<Arc<Source>>, prober: Arc<dyn Prober>) -> Self {
        let source: Arc<Source> = source.into();
        let token = ExclusiveToken::new();
        log::debug!(
            "Opened session for {} ({} video, {} subtitle track(s))",
            source.path.display(),
            source.video_tracks.len(),
            source.subtitle_tracks.len()
        );
        Self {
            params: ParameterStore::new(Arc::clone(&source)),
            subtitles: SubtitleResolver::new(source.subtitle_tracks.clone()),
            detection: DetectionController::new(prober, token.clone()),
            token,
            source,
        }
    }

    #[must_use]
    pub fn source(&self) -> &Arc<Source> {
        &self.source
    }

    #[must_use]
    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }

    #[must_use]
    pub fn subtitles(&self) -> &SubtitleResolver {
        &self.subtitles
    }

    pub fn subtitles_mut(&mut self) -> &mut SubtitleResolver {
        &mut self.subtitles
    }

    // ---- Exclusive operations ----

    /// True while a detection or an encode holds the session's token.
    /// Detection and encode triggers should be disabled while this is set.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.detection.is_busy()
    }

    /// Takes the session's token for an operation other than detection,
    /// such as an encode. Fails with `Busy` while a detection is pending.
    pub fn begin_exclusive(&self, operation: &'static str) -> CoreResult<OperationGuard> {
        self.token.try_acquire(operation)
    }

    // ---- Non-blocking detection ----

    /// Submits an interlace detection job and returns immediately.
    pub fn start_interlace_detection(&mut self, track_index: usize, start_secs: f64) -> CoreResult<()> {
        self.detection
            .submit(&self.source, DetectionJob::interlace(track_index, start_secs))
    }

    /// Submits a crop detection job and returns immediately.
    pub fn start_crop_detection(&mut self, track_index: usize, start_secs: f64) -> CoreResult<()> {
        self.detection
            .submit(&self.source, DetectionJob::crop(track_index, start_secs))
    }

    /// Applies a finished job's outcome, if there is one.
    pub fn poll_detection(&mut self) -> Option<DetectionEvent> {
        self.detection.poll(&mut self.params)
    }

    /// Waits for the pending job and applies its outcome.
    pub fn wait_detection(&mut self) -> Option<DetectionEvent> {
        self.detection.wait(&mut self.params)
    }

    #[must_use]
    pub fn pending_detection(&self) -> Option<&DetectionJob> {
        self.detection.pending_job()
    }

    // ---- Blocking detection ----

    /// Runs interlace detection to completion and returns the detected value,
    /// which has already been written to the deinterlace flag.
    pub fn request_interlace_detection(&mut self, track_index: usize, start_secs: f64) -> CoreResult<bool> {
        self.start_interlace_detection(track_index, start_secs)?;
        self.finish_blocking()?.into_interlace_result()
    }

    /// Runs crop detection to completion and returns the stored crop.
    pub fn request_crop_detection(&mut self, track_index: usize, start_secs: f64) -> CoreResult<CropBox> {
        self.start_crop_detection(track_index, start_secs)?;
        self.finish_blocking()?.into_crop_result()
    }

    fn finish_blocking(&mut self) -> CoreResult<DetectionEvent> {
        self.wait_detection().ok_or_else(|| {
            crate::error::CoreError::ProbeFailed("detection job vanished before completing".to_string())
        })
    }

    // ---- Read-back ----

    #[must_use]
    pub fn snapshot(&self, languages: &dyn LanguageResolver) -> ParameterSnapshot {
        let video_track_options = self
            .source
            .video_tracks
            .iter()
            .enumerate()
            .map(|(index, track)| TrackOption {
                index,
                label: track.label(index),
            })
            .collect();

        ParameterSnapshot {
            source: self.source.path.clone(),
            video_track: self.params.video_track(),
            video_track_options,
            crop: self.params.crop(),
            scale: self.params.scale(),
            anamorphic: self.params.anamorphic(),
            fix_sar: self.params.fix_sar_requested(),
            effective_fix_sar: self.params.effective_fix_sar(),
            deinterlace: self.params.deinterlace(),
            subtitles: SubtitleSnapshot {
                options: self.subtitles.track_options(languages),
                selected: self.subtitles.selected_index(),
                external_path: self.subtitles.external_path().map(PathBuf::from),
                can_burn: self.subtitles.can_burn(),
                burn: self.subtitles.burn_enabled(),
            },
            busy: self.is_busy(),
        }
    }
}
