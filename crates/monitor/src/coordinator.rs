//! Serializes user actions against the poll worker.

use std::sync::Arc;

use tokio::sync::Mutex;
use ydi_cli::{CliError, Subcommand, SyncTool};
use ydi_settings::{Frequency, SettingsStore};

use crate::worker::PollWorker;

/// Runs user-triggered commands without racing the status poll.
///
/// Commands that change the daemon state (`start`, `stop`, `sync`) and
/// frequency changes run with the worker stopped, then polling resumes at
/// the configured interval. Read-only commands (`-v`, `publish`, ...) run
/// alongside the worker. Coordinator operations never overlap each other.
pub struct Coordinator {
    tool: Arc<dyn SyncTool>,
    worker: Arc<PollWorker>,
    settings: Arc<SettingsStore>,
    /// `true` once [`shutdown`](Self::shutdown) ran.
    gate: Mutex<bool>,
}

impl Coordinator {
    pub fn new(
        tool: Arc<dyn SyncTool>,
        worker: Arc<PollWorker>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            tool,
            worker,
            settings,
            gate: Mutex::new(false),
        }
    }

    pub fn worker(&self) -> &Arc<PollWorker> {
        &self.worker
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    /// Starts polling at the configured frequency.
    pub async fn start_polling(&self) -> bool {
        let shut_down = self.gate.lock().await;
        if *shut_down {
            return false;
        }
        let interval = self.settings.frequency().await.interval();
        self.worker.start(interval).await
    }

    /// Runs `command`, pausing polling only if the command changes state.
    ///
    /// Arguments only apply to read-only commands; no state-changing
    /// command takes any.
    pub async fn perform(
        &self,
        command: Subcommand,
        args: Vec<String>,
    ) -> Result<String, CliError> {
        if command.is_state_changing() {
            if !args.is_empty() {
                tracing::debug!(%command, ?args, "arguments ignored");
            }
            self.perform_state_changing(command).await
        } else {
            self.perform_read_only(command, args).await
        }
    }

    /// Stops the worker, runs `command`, then restarts the worker.
    ///
    /// After [`shutdown`](Self::shutdown) the command still runs but polling
    /// stays off.
    pub async fn perform_state_changing(&self, command: Subcommand) -> Result<String, CliError> {
        let shut_down = self.gate.lock().await;

        self.worker.stop().await;
        tracing::info!(%command, "running state-changing command");
        let result = self.tool.run(command, Vec::new()).await;

        match &result {
            Ok(out) => tracing::debug!(%command, output = out.trim(), "command finished"),
            Err(e) => tracing::warn!(%command, "command failed: {e}"),
        }

        if !*shut_down {
            let interval = self.settings.frequency().await.interval();
            self.worker.start(interval).await;
        }
        result
    }

    /// Runs a command that does not touch daemon state, without pausing
    /// the worker.
    pub async fn perform_read_only(
        &self,
        command: Subcommand,
        args: Vec<String>,
    ) -> Result<String, CliError> {
        if command.is_state_changing() {
            return Err(CliError::InvalidCommand(format!(
                "{command} changes the daemon state"
            )));
        }
        self.tool.run(command, args).await
    }

    /// Persists a new update frequency and, if polling, restarts the worker
    /// with the matching interval.
    pub async fn change_frequency(&self, frequency: Frequency) {
        let shut_down = self.gate.lock().await;

        self.settings.set_frequency(frequency).await;
        if !*shut_down && self.worker.stop().await {
            self.worker.start(frequency.interval()).await;
        }
        tracing::info!(%frequency, "update frequency changed");
    }

    /// Stops polling for good.
    pub async fn shutdown(&self) {
        let mut shut_down = self.gate.lock().await;
        *shut_down = true;
        self.worker.stop().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockTool, channel_sink};
    use crate::worker::WorkerState;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use ydi_settings::Settings;
    use ydi_status::{Action, Field, FieldUpdate, Icon};

    const WAIT: Duration = Duration::from_secs(2);

    fn coordinator(
        tool: Arc<MockTool>,
        sink: crate::SinkFn,
        dir: &std::path::Path,
    ) -> Arc<Coordinator> {
        let worker = Arc::new(PollWorker::new(tool.clone(), sink));
        let settings = Arc::new(SettingsStore::with_settings(
            dir.join("ydi.cfg"),
            Settings::default(),
        ));
        Arc::new(Coordinator::new(tool, worker, settings))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn state_changes_never_overlap_a_poll() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = Arc::new(MockTool::running().with_delay(Duration::from_millis(15)));
        let coord = coordinator(tool.clone(), Box::new(|_| {}), tmp.path());

        coord.start_polling().await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        let mut tasks = Vec::new();
        for i in 0..6 {
            let coord = Arc::clone(&coord);
            let cmd = if i % 2 == 0 {
                Subcommand::Stop
            } else {
                Subcommand::Start
            };
            tasks.push(tokio::spawn(async move {
                coord.perform_state_changing(cmd).await.unwrap();
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }
        coord.shutdown().await;

        let mut calls = tool.calls.lock().unwrap().clone();
        calls.sort_by_key(|c| c.started);
        for pair in calls.windows(2) {
            assert!(
                pair[0].finished <= pair[1].started,
                "{:?} overlaps {:?}",
                pair[0].command,
                pair[1].command
            );
        }
        assert_eq!(tool.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(tool.calls_of(Subcommand::Start), 3);
        assert_eq!(tool.calls_of(Subcommand::Stop), 3);
    }

    #[tokio::test]
    async fn start_resumes_polling_with_new_state() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = Arc::new(MockTool::stopped());
        let (sink, mut rx) = channel_sink();
        let coord = coordinator(tool.clone(), sink, tmp.path());

        coord.start_polling().await;
        let first = tokio::time::timeout(WAIT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(
            first.get(Field::Action),
            Some(&FieldUpdate::Action(Action::Start))
        );

        coord.perform_state_changing(Subcommand::Start).await.unwrap();
        assert!(coord.worker().is_running().await);

        let next = tokio::time::timeout(WAIT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(next.get(Field::Icon), Some(&FieldUpdate::Icon(Icon::Normal)));
        assert_eq!(
            next.get(Field::Action),
            Some(&FieldUpdate::Action(Action::Stop))
        );

        coord.shutdown().await;
    }

    #[tokio::test]
    async fn abandoned_action_leaves_worker_recoverable() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = Arc::new(MockTool::running().with_delay(Duration::from_millis(200)));
        let coord = coordinator(tool.clone(), Box::new(|_| {}), tmp.path());

        coord.start_polling().await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        let abandoned = tokio::time::timeout(
            Duration::from_millis(5),
            coord.perform_state_changing(Subcommand::Stop),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(tool.calls_of(Subcommand::Stop), 0);

        coord.perform_state_changing(Subcommand::Stop).await.unwrap();
        assert_eq!(tool.calls_of(Subcommand::Stop), 1);
        assert_eq!(
            coord.worker().state().await,
            WorkerState::Running(Duration::from_secs(5))
        );

        coord.shutdown().await;
        assert_eq!(coord.worker().state().await, WorkerState::Stopped);
    }

    #[tokio::test]
    async fn read_only_commands_keep_worker_running() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = Arc::new(MockTool::running());
        let coord = coordinator(tool.clone(), Box::new(|_| {}), tmp.path());

        coord.start_polling().await;
        let version = coord
            .perform_read_only(Subcommand::Version, Vec::new())
            .await
            .unwrap();
        assert!(version.starts_with("yandex-disk"));
        assert!(coord.worker().is_running().await);

        let err = coord
            .perform_read_only(Subcommand::Stop, Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidCommand(_)));
        assert_eq!(tool.calls_of(Subcommand::Stop), 0);

        coord.shutdown().await;
    }

    #[tokio::test]
    async fn perform_dispatches_by_command_class() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = Arc::new(MockTool::running());
        let coord = coordinator(tool.clone(), Box::new(|_| {}), tmp.path());

        coord.perform(Subcommand::Stop, Vec::new()).await.unwrap();
        // State-changing path restarts polling even if it was off.
        assert!(coord.worker().is_running().await);

        coord
            .perform(Subcommand::Publish, vec!["a.txt".into()])
            .await
            .unwrap();
        assert_eq!(tool.calls_of(Subcommand::Publish), 1);

        coord.shutdown().await;
    }

    #[tokio::test]
    async fn frequency_change_restarts_with_new_interval() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = Arc::new(MockTool::running());
        let coord = coordinator(tool, Box::new(|_| {}), tmp.path());

        coord.start_polling().await;
        assert_eq!(
            coord.worker().state().await,
            WorkerState::Running(Duration::from_secs(5))
        );

        coord.change_frequency(Frequency::High).await;
        assert_eq!(
            coord.worker().state().await,
            WorkerState::Running(Duration::from_secs(1))
        );

        let saved = Settings::load(&tmp.path().join("ydi.cfg")).unwrap();
        assert_eq!(saved.frequency, Frequency::High);

        coord.shutdown().await;
    }

    #[tokio::test]
    async fn frequency_change_while_stopped_stays_stopped() {
        let tmp = tempfile::tempdir().unwrap();
        let coord = coordinator(Arc::new(MockTool::running()), Box::new(|_| {}), tmp.path());

        coord.change_frequency(Frequency::Medium).await;
        assert_eq!(coord.worker().state().await, WorkerState::Stopped);
        assert_eq!(coord.settings().frequency().await, Frequency::Medium);
    }

    #[tokio::test]
    async fn shutdown_keeps_polling_off() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = Arc::new(MockTool::stopped());
        let coord = coordinator(tool.clone(), Box::new(|_| {}), tmp.path());

        coord.start_polling().await;
        coord.shutdown().await;
        assert!(!coord.worker().is_running().await);

        coord.perform_state_changing(Subcommand::Start).await.unwrap();
        assert!(!coord.worker().is_running().await);
        assert!(!coord.start_polling().await);
        assert_eq!(tool.calls_of(Subcommand::Start), 1);
    }
}
