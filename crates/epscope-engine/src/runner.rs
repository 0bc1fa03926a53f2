use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::SystemTime;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use epscope_logs::ChannelTx;
use epscope_types::{DiagnosticRecord, Severity};

/// The simulation engine, seen from the orchestrator: a synchronous call
/// that reports through callbacks and returns a completion status
/// (0 = success, anything else = failure).
pub trait EnergyPlusEngine: Send + Sync + 'static {
    fn run(&self, input: &Path, output_dir: &Path, callbacks: &EngineCallbacks) -> i32;
}

/// The three callbacks the orchestrator hands to the worker, plus the shared
/// progress cell. This is the only state crossing the worker/display
/// boundary besides the channels themselves.
pub struct EngineCallbacks {
    raw_tx: ChannelTx<String>,
    diag_tx: ChannelTx<DiagnosticRecord>,
    progress: Arc<AtomicI32>,
    wake: Arc<Notify>,
}

impl EngineCallbacks {
    pub fn new(
        raw_tx: ChannelTx<String>,
        diag_tx: ChannelTx<DiagnosticRecord>,
        progress: Arc<AtomicI32>,
        wake: Arc<Notify>,
    ) -> Self {
        Self {
            raw_tx,
            diag_tx,
            progress,
            wake,
        }
    }

    /// Progress in percent; negative values mean the run failed.
    pub fn progress(&self, percent: i32) {
        self.progress.store(percent.min(100), Ordering::Relaxed);
        self.wake.notify_one();
    }

    /// One line of engine stdout, forwarded verbatim to the raw view.
    pub fn stdout_line(&self, line: String) {
        self.raw_tx.send(line);
    }

    /// One structured diagnostic event.
    pub fn error_event(&self, level: Severity, message: String) {
        self.diag_tx.send(DiagnosticRecord::new(level, message));
    }
}

/// Outcome of a start request.
#[derive(Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// A worker is still active; the request is ignored.
    AlreadyRunning,
    /// A completed run exists and the input was not modified since; the
    /// request is refused (reported as an informational message upstream).
    InputUnchanged { modified: SystemTime },
}

/// Owns the worker task for one engine invocation at a time.
pub struct EngineRunner {
    engine: Arc<dyn EnergyPlusEngine>,
    progress: Arc<AtomicI32>,
    worker: Option<JoinHandle<()>>,
    last_input_mtime: Option<SystemTime>,
}

impl EngineRunner {
    pub fn new(engine: Arc<dyn EnergyPlusEngine>, progress: Arc<AtomicI32>) -> Self {
        Self {
            engine,
            progress,
            worker: None,
            last_input_mtime: None,
        }
    }

    pub fn progress(&self) -> i32 {
        self.progress.load(Ordering::Relaxed)
    }

    /// Whether a worker is currently running the engine.
    pub fn is_active(&self) -> bool {
        self.worker.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Spawn the engine on a blocking worker, unless one is active or the
    /// stale re-run guard refuses.
    ///
    /// `guard_unchanged` is set when a completed run's results exist; in that
    /// case an input file whose mtime did not advance since the last start is
    /// refused.
    pub fn start(
        &mut self,
        input: PathBuf,
        output_dir: PathBuf,
        callbacks: EngineCallbacks,
        guard_unchanged: bool,
    ) -> StartOutcome {
        if self.is_active() {
            return StartOutcome::AlreadyRunning;
        }
        self.worker.take();

        let mtime = modified_time(&input);
        if guard_unchanged
            && let (Some(new), Some(last)) = (mtime, self.last_input_mtime)
            && new <= last
        {
            return StartOutcome::InputUnchanged { modified: new };
        }
        self.last_input_mtime = mtime;

        self.progress.store(0, Ordering::Relaxed);

        let engine = Arc::clone(&self.engine);
        self.worker = Some(tokio::task::spawn_blocking(move || {
            let status = engine.run(&input, &output_dir, &callbacks);
            tracing::debug!(status, "engine run finished");
            // the completion status is folded into the progress convention
            callbacks.progress(if status == 0 { 100 } else { -1 });
        }));

        StartOutcome::Started
    }

    /// Wait for the active worker to finish. There is no mid-run
    /// cancellation of the engine; quitting joins.
    pub async fn join(&mut self) {
        if let Some(task) = self.worker.take() {
            let _ = task.await;
        }
    }
}

/// Modification time of a file, if it can be read.
pub fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
