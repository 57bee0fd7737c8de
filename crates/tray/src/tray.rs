//! Tray handle, events, and update types.
//!
//! The tray backend runs on its own thread (GTK-based backends insist on
//! owning one), so both directions use `std::sync::mpsc`: sending never
//! blocks and works from async tasks and plain threads alike.

use std::path::PathBuf;
use std::sync::mpsc;

use ydi_settings::{Frequency, IconTheme};
use ydi_status::UpdateRecord;

use crate::menu::MenuState;

/// Configuration for the tray.
#[derive(Debug, Clone)]
pub struct TrayConfig {
    /// Application indicator id.
    pub id: String,
    /// Directory holding the `Light_Theme` and `Dark_Theme` icon sets.
    pub icon_root: PathBuf,
    /// Desktop theme name, used when the icon theme follows the desktop.
    pub desktop_theme: Option<String>,
    pub frequency: Frequency,
    pub icon_theme: IconTheme,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            id: "com.dandelion-systems.yandexdisk".into(),
            icon_root: PathBuf::from("Icons"),
            desktop_theme: None,
            frequency: Frequency::default(),
            icon_theme: IconTheme::default(),
        }
    }
}

/// Events emitted by the tray to the indicator core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    StartRequested,
    StopRequested,
    /// Open the Yandex.Disk folder in a file manager.
    OpenFolder(PathBuf),
    SetFrequency(Frequency),
    SetIconTheme(IconTheme),
    About,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
}

/// Updates sent from the indicator core to the tray.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayUpdate {
    /// Redraw the fields carried by the record.
    Apply(UpdateRecord),
    /// Switch icon sets.
    IconTheme(IconTheme),
    /// Show a modal message dialog.
    ShowMessage {
        kind: MessageKind,
        title: String,
        body: String,
    },
    /// Request tray shutdown.
    Shutdown,
}

/// Handle for communicating with the tray from the indicator core.
pub struct TrayHandle {
    update_tx: mpsc::Sender<TrayUpdate>,
    event_rx: mpsc::Receiver<TrayEvent>,
}

impl TrayHandle {
    /// Creates a new tray handle with its channel pair.
    ///
    /// Returns `(handle, event_sender, update_receiver)`. The sender and
    /// receiver go to the tray backend, along with a [`MenuState`] built from
    /// the same `config`.
    pub fn new(
        config: &TrayConfig,
    ) -> (Self, mpsc::Sender<TrayEvent>, mpsc::Receiver<TrayUpdate>) {
        let (update_tx, update_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        tracing::debug!(id = %config.id, "tray channels created");
        (
            Self {
                update_tx,
                event_rx,
            },
            event_tx,
            update_rx,
        )
    }

    /// Returns a callback forwarding status records to the tray.
    ///
    /// Safe to call from the poll worker task; records sent after the tray
    /// is gone are dropped.
    pub fn sink(&self) -> impl Fn(UpdateRecord) + Send + Sync + use<> {
        let tx = self.update_tx.clone();
        move |record| {
            let _ = tx.send(TrayUpdate::Apply(record));
        }
    }

    pub fn icon_theme(&self, theme: IconTheme) {
        let _ = self.update_tx.send(TrayUpdate::IconTheme(theme));
    }

    pub fn show_message(&self, kind: MessageKind, title: &str, body: &str) {
        let _ = self.update_tx.send(TrayUpdate::ShowMessage {
            kind,
            title: title.into(),
            body: body.into(),
        });
    }

    /// Requests the tray to shut down.
    pub fn shutdown(&self) {
        let _ = self.update_tx.send(TrayUpdate::Shutdown);
    }

    /// Tries to receive a tray event (non-blocking).
    pub fn try_recv_event(&self) -> Option<TrayEvent> {
        self.event_rx.try_recv().ok()
    }
}

/// Drains every pending update into `state`.
///
/// Messages have no place in the menu model and are handed to `on_message`.
/// Returns `false` once shutdown was requested or the handle was dropped.
pub fn pump_updates(
    state: &mut MenuState,
    update_rx: &mpsc::Receiver<TrayUpdate>,
    mut on_message: impl FnMut(MessageKind, &str, &str),
) -> bool {
    loop {
        match update_rx.try_recv() {
            Ok(TrayUpdate::Apply(record)) => {
                tracing::trace!(fields = ?record.fields(), "applying status update");
                state.apply(&record);
            }
            Ok(TrayUpdate::IconTheme(theme)) => state.icon_theme = theme,
            Ok(TrayUpdate::ShowMessage { kind, title, body }) => on_message(kind, &title, &body),
            Ok(TrayUpdate::Shutdown) => return false,
            Err(mpsc::TryRecvError::Empty) => return true,
            Err(mpsc::TryRecvError::Disconnected) => return false,
        }
    }
}
