//! Application orchestrator: wires the tool, poll worker, coordinator and
//! tray together.

use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use ydi_cli::{Subcommand, SyncTool};
use ydi_monitor::{Coordinator, PollWorker};
use ydi_settings::SettingsStore;
use ydi_tray::{MenuState, MessageKind, TrayConfig, TrayEvent, TrayHandle, TrayUpdate};

use crate::launcher;

const ABOUT_TITLE: &str = "Yandex Disk Indicator";
const ABOUT_TEXT: &str =
    "Yandex Disk indicator and control\nversion 1.0\n\u{a9} 2025 Dandelion {Systems}\n\n";

/// Whether the event loop keeps going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The running indicator core.
pub struct Indicator {
    coordinator: Arc<Coordinator>,
    tray: TrayHandle,
}

impl Indicator {
    /// Builds the worker and coordinator and points the worker at the tray.
    pub fn new(tool: Arc<dyn SyncTool>, settings: Arc<SettingsStore>, tray: TrayHandle) -> Self {
        let worker = Arc::new(PollWorker::new(Arc::clone(&tool), Box::new(tray.sink())));
        let coordinator = Arc::new(Coordinator::new(tool, worker, settings));
        Self { coordinator, tray }
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    pub async fn start(&self) {
        self.coordinator.start_polling().await;
    }

    /// Handles one menu click.
    pub async fn handle_event(&self, event: TrayEvent) -> Flow {
        tracing::debug!(?event, "tray event");

        match event {
            TrayEvent::StartRequested => self.run_action(Subcommand::Start).await,
            TrayEvent::StopRequested => self.run_action(Subcommand::Stop).await,
            TrayEvent::OpenFolder(path) => match launcher::open_folder(&path) {
                Ok(true) => {}
                Ok(false) => self.tray.show_message(
                    MessageKind::Warning,
                    launcher::NOT_FOUND_TITLE,
                    launcher::NOT_FOUND_BODY,
                ),
                Err(e) => tracing::warn!(path = %path.display(), "failed to open folder: {e}"),
            },
            TrayEvent::SetFrequency(frequency) => {
                self.coordinator.change_frequency(frequency).await;
            }
            TrayEvent::SetIconTheme(theme) => {
                self.coordinator.settings().set_icon_theme(theme).await;
                self.tray.icon_theme(theme);
            }
            TrayEvent::About => {
                let version = match self
                    .coordinator
                    .perform_read_only(Subcommand::Version, Vec::new())
                    .await
                {
                    Ok(text) => text,
                    Err(e) => e.to_string(),
                };
                self.tray.show_message(
                    MessageKind::Info,
                    ABOUT_TITLE,
                    &format!("{ABOUT_TEXT}{version}"),
                );
            }
            TrayEvent::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    async fn run_action(&self, command: Subcommand) {
        // The tool reports its own failures as text; the next poll shows the
        // resulting state either way.
        if let Err(e) = self.coordinator.perform_state_changing(command).await {
            tracing::error!(%command, "action failed: {e}");
        }
    }

    pub async fn shutdown(&self) {
        self.coordinator().shutdown().await;
        self.tray.shutdown();
    }

    /// Waits for the next tray event.
    async fn next_event(&self) -> TrayEvent {
        loop {
            if let Some(event) = self.tray.try_recv_event() {
                return event;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

/// Runs the indicator until quit or Ctrl-C.
pub async fn run(tool: Arc<dyn SyncTool>, settings: Arc<SettingsStore>) -> anyhow::Result<()> {
    let current = settings.get().await;
    let tray_config = TrayConfig {
        desktop_theme: std::env::var("GTK_THEME").ok(),
        frequency: current.frequency,
        icon_theme: current.icon_theme,
        ..TrayConfig::default()
    };
    let (tray, _event_tx, update_rx) = TrayHandle::new(&tray_config);
    let backend = spawn_headless_tray(tray_config, update_rx)?;

    let indicator = Indicator::new(tool, settings, tray);
    indicator.start().await;
    tracing::info!("indicator ready");

    // -- Main loop --
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("SIGINT received, shutting down");
                break;
            }
            event = indicator.next_event() => {
                if indicator.handle_event(event).await == Flow::Quit {
                    tracing::info!("quit requested via tray");
                    break;
                }
            }
        }
    }

    // -- Graceful shutdown --
    indicator.shutdown().await;
    if backend.join().is_err() {
        tracing::error!("tray backend panicked");
    }
    Ok(())
}

/// Tray backend without a display: keeps the menu model current and logs
/// what a graphical backend would draw.
fn spawn_headless_tray(
    config: TrayConfig,
    update_rx: mpsc::Receiver<TrayUpdate>,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("ydi-tray".into())
        .spawn(move || {
            let mut state = MenuState::new(&config);
            let mut icon = state.icon_path();
            let mut status = state.status.clone();

            while ydi_tray::pump_updates(&mut state, &update_rx, |kind, title, body| {
                match kind {
                    MessageKind::Info => tracing::info!(title, "{body}"),
                    MessageKind::Warning => tracing::warn!(title, "{body}"),
                }
            }) {
                if state.icon_path() != icon {
                    icon = state.icon_path();
                    tracing::info!(icon = %icon.display(), "tray icon changed");
                }
                if state.status != status {
                    status.clone_from(&state.status);
                    tracing::debug!(menu_items = state.build_menu().len(), "{status}");
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            tracing::debug!("tray backend stopped");
        })
}
