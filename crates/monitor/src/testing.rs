//! Scripted sync tools for worker and coordinator tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use ydi_cli::{CliError, Subcommand, SyncTool, ToolFuture};
use ydi_status::UpdateRecord;

use crate::worker::SinkFn;

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub command: Subcommand,
    pub started: Instant,
    pub finished: Instant,
}

/// In-memory stand-in for the daemon: `start`/`stop` flip its state and
/// `status` reports it.
pub struct MockTool {
    running: AtomicBool,
    used: Mutex<String>,
    delay: Duration,
    pub calls: Mutex<Vec<Call>>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl MockTool {
    pub fn running() -> Self {
        Self::new(true)
    }

    pub fn stopped() -> Self {
        Self::new(false)
    }

    fn new(running: bool) -> Self {
        Self {
            running: AtomicBool::new(running),
            used: Mutex::new("10 GB".into()),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Makes every invocation take `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_used(&self, used: &str) {
        *self.used.lock().unwrap() = used.to_string();
    }

    pub fn status_calls(&self) -> usize {
        self.calls_of(Subcommand::Status)
    }

    pub fn calls_of(&self, command: Subcommand) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.command == command)
            .count()
    }

    fn report(&self) -> String {
        if self.running.load(Ordering::SeqCst) {
            format!(
                "Synchronization core status: idle\n\
                 Path to Yandex.Disk directory: '/home/test/Yandex.Disk'\n\
                 \tTotal: 20 GB\n\tUsed: {}\n\
                 Last synchronized items:\n\tfile: 'a.txt'\n",
                self.used.lock().unwrap()
            )
        } else {
            "Error: daemon not started\n".into()
        }
    }
}

impl SyncTool for MockTool {
    fn run(&self, command: Subcommand, _args: Vec<String>) -> ToolFuture<'_> {
        Box::pin(async move {
            let started = Instant::now();
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let out = match command {
                Subcommand::Start => {
                    self.running.store(true, Ordering::SeqCst);
                    "Starting daemon process...Done\n".to_string()
                }
                Subcommand::Stop => {
                    self.running.store(false, Ordering::SeqCst);
                    "Daemon stopped.\n".to_string()
                }
                Subcommand::Status => self.report(),
                Subcommand::Version => "yandex-disk 0.1.6.1080\n".to_string(),
                _ => String::new(),
            };

            let finished = Instant::now();
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.calls.lock().unwrap().push(Call {
                command,
                started,
                finished,
            });
            Ok(out)
        })
    }
}

/// A tool whose process can never be spawned.
pub struct FailingTool;

impl SyncTool for FailingTool {
    fn run(&self, _command: Subcommand, _args: Vec<String>) -> ToolFuture<'_> {
        Box::pin(async {
            Err(CliError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such file",
            )))
        })
    }
}

/// A sink forwarding records into a channel the test can await.
pub fn channel_sink() -> (SinkFn, mpsc::UnboundedReceiver<UpdateRecord>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let sink: SinkFn = Box::new(move |record| {
        let _ = tx.send(record);
    });
    (sink, rx)
}
