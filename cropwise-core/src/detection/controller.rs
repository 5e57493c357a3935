// ============================================================================
// cropwise-core/src/detection/controller.rs
// ============================================================================
//
// DETECTION CONTROLLER: Single In-Flight Probe per Session
//
// The controller turns a DetectionJob into a prober call on a worker thread
// and hands the outcome back through a channel. The session drains that
// channel with poll()/wait(); the outcome is written into the ParameterStore
// there, and only afterwards is the exclusive token released. A caller that
// waits for "not busy" therefore always sees the updated parameters.
//
// KEY COMPONENTS:
// - DetectionController: owns the prober, the pending job and its guard
// - PendingDetection: receiver + token guard of the job in flight
//
// CANCELLATION:
// Dropping the controller drops the receiver. The worker still runs the
// prober to completion, its send fails, and the result is discarded.
//
// AI-ASSISTANT-INFO: Probe job submission, result application and busy state

use crate::detection::exclusive::{ExclusiveToken, OperationGuard};
use crate::detection::{DetectionEvent, DetectionJob, DetectionKind, DetectionOutcome};
use crate::error::{CoreError, CoreResult, TrackKind};
use crate::external::{CropArea, Prober};
use crate::media::Source;
use crate::params::ParameterStore;
use crossbeam_channel::{Receiver, RecvError, TryRecvError, bounded};
use std::sync::Arc;
use std::thread;

/// Raw prober answer travelling from the worker thread.
enum ProbeOutcome {
    Interlace(CoreResult<bool>),
    Crop(CoreResult<CropArea>),
}

struct PendingDetection {
    job: DetectionJob,
    results: Receiver<ProbeOutcome>,
    // Held until the outcome has been applied.
    _guard: OperationGuard,
}

/// Issues probe jobs and applies their outcomes, one job at a time.
pub struct DetectionController {
    prober: Arc<dyn Prober>,
    token: ExclusiveToken,
    pending: Option<PendingDetection>,
}

impl DetectionController {
    /// `token` is the session's exclusive token, shared with any other
    /// long-running operation of the session.
    #[must_use]
    pub fn new(prober: Arc<dyn Prober>, token: ExclusiveToken) -> Self {
        Self {
            prober,
            token,
            pending: None,
        }
    }

    /// True while a detection, or any other holder of the token, is running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.token.is_held()
    }

    #[must_use]
    pub fn pending_job(&self) -> Option<&DetectionJob> {
        self.pending.as_ref().map(|p| &p.job)
    }

    /// Starts `job` against `source` without waiting for it.
    ///
    /// Fails with `Busy` while the token is held and with `InvalidIndex`
    /// when the source has no such video track. Neither touches parameters.
    pub fn submit(&mut self, source: &Source, job: DetectionJob) -> CoreResult<()> {
        let guard = self.token.try_acquire(job.kind.operation_name())?;

        if source.video_track(job.track_index).is_none() {
            return Err(CoreError::InvalidIndex {
                kind: TrackKind::Video,
                index: job.track_index,
                available: source.video_tracks.len(),
            });
        }

        let (tx, rx) = bounded(1);
        let prober = Arc::clone(&self.prober);
        let path = source.path.clone();

        log::debug!(
            "Starting {} on {} (track {}, start {:.3}s)",
            job.kind,
            path.display(),
            job.track_index,
            job.start_secs
        );

        thread::Builder::new()
            .name(format!("cropwise-{}", job.kind.operation_name().replace(' ', "-")))
            .spawn(move || {
                let outcome = match job.kind {
                    DetectionKind::Interlace => ProbeOutcome::Interlace(prober.detect_interlace(
                        &path,
                        job.track_index,
                        job.start_secs,
                    )),
                    DetectionKind::Crop => ProbeOutcome::Crop(prober.detect_crop_area(
                        &path,
                        job.track_index,
                        job.start_secs,
                    )),
                };
                if tx.send(outcome).is_err() {
                    log::debug!("Discarding {} result for {}: session closed", job.kind, path.display());
                }
            })?;

        self.pending = Some(PendingDetection {
            job,
            results: rx,
            _guard: guard,
        });
        Ok(())
    }

    /// Applies the pending job's outcome if it has arrived. Never blocks.
    pub fn poll(&mut self, params: &mut ParameterStore) -> Option<DetectionEvent> {
        let received = match self.pending.as_ref()?.results.try_recv() {
            Ok(outcome) => Ok(outcome),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(RecvError),
        };
        let pending = self.pending.take()?;
        Some(Self::finish(pending, received, params))
    }

    /// Blocks until the pending job's outcome arrives, then applies it.
    /// Returns `None` when nothing is pending.
    pub fn wait(&mut self, params: &mut ParameterStore) -> Option<DetectionEvent> {
        let received = self.pending.as_ref()?.results.recv();
        let pending = self.pending.take()?;
        Some(Self::finish(pending, received, params))
    }

    /// Writes the outcome into `params`, then releases the token.
    fn finish(
        pending: PendingDetection,
        received: Result<ProbeOutcome, RecvError>,
        params: &mut ParameterStore,
    ) -> DetectionEvent {
        let job = pending.job;

        let outcome = match received {
            Ok(ProbeOutcome::Interlace(Ok(interlaced))) => {
                params.set_deinterlace(interlaced);
                log::info!("Interlace detection: deinterlace set to {}", interlaced);
                DetectionOutcome::Interlaced(interlaced)
            }
            Ok(ProbeOutcome::Crop(Ok(area))) => {
                let stored = params.apply_detected_crop(area, job.track_index);
                if stored.is_unset() {
                    log::info!("Crop detection: {}x{} covers the full frame, no crop", area.width, area.height);
                } else {
                    log::info!(
                        "Crop detection: crop={}:{}:{}:{}",
                        area.width,
                        area.height,
                        area.left,
                        area.top
                    );
                }
                DetectionOutcome::Cropped(stored)
            }
            Ok(ProbeOutcome::Interlace(Err(err))) | Ok(ProbeOutcome::Crop(Err(err))) => {
                let err = err.into_probe_failure();
                log::warn!("{} failed, parameters unchanged: {}", job.kind, err);
                DetectionOutcome::Failed(err)
            }
            Err(RecvError) => {
                log::warn!("{} worker stopped without a result", job.kind);
                DetectionOutcome::Failed(CoreError::ProbeFailed(
                    "prober stopped without reporting a result".to_string(),
                ))
            }
        };

        drop(pending._guard);
        DetectionEvent { job, outcome }
    }
}

impl Drop for DetectionController {
    fn drop(&mut self) {
        if let Some(pending) = &self.pending {
            log::debug!(
                "Session closed with {} pending; its result will be discarded",
                pending.job.kind
            );
        }
    }
}
