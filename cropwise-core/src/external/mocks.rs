// cropwise-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests, and for integration tests through the
// "test-mocks" feature.

use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use crate::external::prober::{CropArea, Prober};
use crossbeam_channel::{Receiver, Sender, unbounded};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::collections::VecDeque;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::{Arc, Mutex};

// ---- Prober mock ----

/// A call received by [`MockProber`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockProbeCall {
    Interlace { path: PathBuf, track_index: usize, start_secs: f64 },
    Crop { path: PathBuf, track_index: usize, start_secs: f64 },
}

#[derive(Default)]
struct MockProberState {
    interlace_results: VecDeque<Result<bool, String>>,
    crop_results: VecDeque<Result<CropArea, String>>,
    calls: Vec<MockProbeCall>,
}

/// Scripted prober. Results are handed out in the order they were queued;
/// an empty queue answers with a probe failure.
///
/// A gated mock blocks every call until its [`ProbeGate`] lets one through,
/// which keeps a detection job pending for as long as a test needs.
#[derive(Clone, Default)]
pub struct MockProber {
    state: Arc<Mutex<MockProberState>>,
    gate: Option<Receiver<()>>,
}

/// Releases calls blocked in a gated [`MockProber`].
#[derive(Clone)]
pub struct ProbeGate {
    tx: Sender<()>,
}

impl ProbeGate {
    /// Lets exactly one blocked (or future) call proceed.
    pub fn release(&self) {
        let _ = self.tx.send(());
    }
}

impl MockProber {
    pub fn new() -> Self {
        Default::default()
    }

    /// Shares this mock behind a handle that reports when its last holder
    /// lets go of it.
    ///
    /// The receiver gets one message when the returned `Arc` and all its
    /// clones are dropped: `true` for a normal drop, `false` when the last
    /// holder dropped it while unwinding from a panic.
    pub fn tracked(&self) -> (Arc<dyn Prober>, Receiver<bool>) {
        let (tx, rx) = unbounded();
        let tracked = TrackedProber {
            inner: self.clone(),
            released: tx,
        };
        (Arc::new(tracked), rx)
    }

    /// A mock whose calls wait for the returned gate.
    pub fn gated() -> (Self, ProbeGate) {
        let (tx, rx) = unbounded();
        let prober = Self {
            state: Arc::default(),
            gate: Some(rx),
        };
        (prober, ProbeGate { tx })
    }

    pub fn push_interlace(&self, result: Result<bool, &str>) {
        self.lock()
            .interlace_results
            .push_back(result.map_err(str::to_string));
    }

    pub fn push_crop(&self, result: Result<CropArea, &str>) {
        self.lock().crop_results.push_back(result.map_err(str::to_string));
    }

    pub fn calls(&self) -> Vec<MockProbeCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockProberState> {
        // A panicking test thread must not hide the calls from the others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            let _ = gate.recv();
        }
    }
}

impl Prober for MockProber {
    fn detect_interlace(&self, source: &Path, track_index: usize, start_secs: f64) -> CoreResult<bool> {
        self.lock().calls.push(MockProbeCall::Interlace {
            path: source.to_path_buf(),
            track_index,
            start_secs,
        });
        self.wait_for_gate();
        match self.lock().interlace_results.pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(CoreError::ProbeFailed(message)),
            None => Err(CoreError::ProbeFailed(
                "MockProber: no interlace result queued".to_string(),
            )),
        }
    }

    fn detect_crop_area(&self, source: &Path, track_index: usize, start_secs: f64) -> CoreResult<CropArea> {
        self.lock().calls.push(MockProbeCall::Crop {
            path: source.to_path_buf(),
            track_index,
            start_secs,
        });
        self.wait_for_gate();
        match self.lock().crop_results.pop_front() {
            Some(Ok(area)) => Ok(area),
            Some(Err(message)) => Err(CoreError::ProbeFailed(message)),
            None => Err(CoreError::ProbeFailed(
                "MockProber: no crop result queued".to_string(),
            )),
        }
    }
}

struct TrackedProber {
    inner: MockProber,
    released: Sender<bool>,
}

impl Prober for TrackedProber {
    fn detect_interlace(&self, source: &Path, track_index: usize, start_secs: f64) -> CoreResult<bool> {
        self.inner.detect_interlace(source, track_index, start_secs)
    }

    fn detect_crop_area(&self, source: &Path, track_index: usize, start_secs: f64) -> CoreResult<CropArea> {
        self.inner.detect_crop_area(source, track_index, start_secs)
    }
}

impl Drop for TrackedProber {
    fn drop(&mut self) {
        let _ = self.released.send(!std::thread::panicking());
    }
}

// ---- FFmpeg process mock ----

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Vec<FfmpegEvent>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events_to_emit.clone() {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Arc<Mutex<Vec<MockFfmpegExpectation>>>,
    received_calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(&self, arg_pattern: &str, result: CoreResult<MockFfmpegProcess>) {
        lock(&self.expectations).push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
        });
    }

    pub fn add_success_expectation(&self, arg_pattern: &str, events: Vec<FfmpegEvent>) {
        let process = MockFfmpegProcess {
            events_to_emit: events,
            exit_status: ExitStatus::from_raw(0),
        };
        self.add_expectation(arg_pattern, Ok(process));
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error));
    }

    pub fn add_exit_error_expectation(&self, arg_pattern: &str, events: Vec<FfmpegEvent>, exit_code: i32) {
        let process = MockFfmpegProcess {
            events_to_emit: events,
            // Raw wait status: the exit code lives in the second byte.
            exit_status: ExitStatus::from_raw(exit_code << 8),
        };
        self.add_expectation(arg_pattern, Ok(process));
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        lock(&self.received_calls).clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        lock(&self.received_calls).push(args.clone());

        let mut expectations = lock(&self.expectations);
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        match found_index {
            Some(index) => {
                let expectation = expectations.remove(index);
                log::info!(
                    "MockFfmpegSpawner: Matched expectation with pattern '{}'",
                    expectation.arg_pattern
                );
                expectation.result
            }
            None => {
                log::error!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
                panic!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
