//! Background status poll loop with an explicit start/stop lifecycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use ydi_cli::{Subcommand, SyncTool};
use ydi_status::{StatusSnapshot, UpdateRecord, diff, full, parse_status};

/// Callback receiving every non-empty update record.
///
/// Called on the worker task, never on a UI thread; forwarding to the UI
/// is the callback's job.
pub type SinkFn = Box<dyn Fn(UpdateRecord) + Send + Sync + 'static>;

/// Lifecycle state of a [`PollWorker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Stopped,
    Running(Duration),
}

/// Periodic `status` poller.
///
/// At most one poll loop exists at a time. The snapshot the loop diffs
/// against moves into the loop on [`start`](Self::start) and comes back on
/// [`stop`](Self::stop), so after a restart only real changes are
/// published again.
pub struct PollWorker {
    tool: Arc<dyn SyncTool>,
    sink: Arc<SinkFn>,
    inner: Mutex<WorkerInner>,
}

struct WorkerInner {
    state: WorkerState,
    cancel: Option<CancellationToken>,
    task: Option<JoinHandle<Option<StatusSnapshot>>>,
    last: Option<StatusSnapshot>,
}

impl PollWorker {
    pub fn new(tool: Arc<dyn SyncTool>, sink: SinkFn) -> Self {
        Self {
            tool,
            sink: Arc::new(sink),
            inner: Mutex::new(WorkerInner {
                state: WorkerState::Stopped,
                cancel: None,
                task: None,
                last: None,
            }),
        }
    }

    /// Starts polling every `interval`. Returns immediately.
    ///
    /// Does nothing and returns `false` if the worker is already running;
    /// the running loop keeps its interval.
    pub async fn start(&self, interval: Duration) -> bool {
        let mut inner = self.inner.lock().await;

        if let WorkerState::Running(current) = inner.state {
            tracing::debug!(
                interval_ms = current.as_millis() as u64,
                "poll worker already running"
            );
            return false;
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_loop(
            Arc::clone(&self.tool),
            Arc::clone(&self.sink),
            interval,
            cancel.clone(),
            inner.last.take(),
        ));

        inner.cancel = Some(cancel);
        inner.task = Some(task);
        inner.state = WorkerState::Running(interval);

        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            "poll worker started"
        );
        true
    }

    /// Stops polling and waits for the loop to exit.
    ///
    /// A `status` call already in progress is allowed to finish first, so
    /// once this returns no poll is in flight. Returns `false` if the worker
    /// was not running.
    ///
    /// The task handle stays in place until the join completes, so a `stop`
    /// dropped mid-wait leaves the worker `Running` and a later `stop` picks
    /// up the same join.
    pub async fn stop(&self) -> bool {
        let mut inner = self.inner.lock().await;

        if let Some(cancel) = &inner.cancel {
            cancel.cancel();
        }
        let Some(task) = inner.task.as_mut() else {
            return false;
        };

        let joined = task.await;
        inner.task = None;
        inner.cancel = None;
        inner.last = match joined {
            Ok(last) => last,
            Err(e) => {
                tracing::error!("poll loop ended abnormally: {e}");
                None
            }
        };
        inner.state = WorkerState::Stopped;

        tracing::info!("poll worker stopped");
        true
    }

    pub async fn state(&self) -> WorkerState {
        self.inner.lock().await.state
    }

    pub async fn is_running(&self) -> bool {
        matches!(self.state().await, WorkerState::Running(_))
    }
}

impl Drop for PollWorker {
    fn drop(&mut self) {
        if let Some(cancel) = self.inner.get_mut().cancel.take() {
            cancel.cancel();
        }
    }
}

async fn poll_loop(
    tool: Arc<dyn SyncTool>,
    sink: Arc<SinkFn>,
    interval: Duration,
    cancel: CancellationToken,
    mut previous: Option<StatusSnapshot>,
) -> Option<StatusSnapshot> {
    while !cancel.is_cancelled() {
        let snapshot = poll_status(tool.as_ref()).await;

        let record = match &previous {
            Some(prev) => {
                if prev.sync_status != snapshot.sync_status {
                    tracing::info!(
                        from = ?prev.sync_status,
                        to = ?snapshot.sync_status,
                        "sync state changed"
                    );
                }
                diff(prev, &snapshot)
            }
            None => full(&snapshot),
        };

        if !record.is_empty() {
            tracing::debug!(fields = ?record.fields(), "publishing status update");
            (sink)(record);
        }
        previous = Some(snapshot);

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    previous
}

/// Runs `status` once. Failing to run the tool reads as "not running".
async fn poll_status(tool: &dyn SyncTool) -> StatusSnapshot {
    match tool.run(Subcommand::Status, Vec::new()).await {
        Ok(raw) => parse_status(&raw),
        Err(e) => {
            tracing::warn!("status poll failed: {e}");
            StatusSnapshot::default()
        }
    }
}
