//! Adapter around the `yandex-disk` command-line tool.
//!
//! The indicator never talks to the sync daemon directly: every piece of
//! information comes from running the CLI and reading its output. This
//! crate owns that boundary:
//!
//! - [`YandexDisk::locate`] finds the executable on `PATH`
//! - [`YandexDisk::command`] runs a subcommand with a fixed locale and
//!   returns its output, even on a nonzero exit
//! - [`parse_status`] turns the `status` report into a [`StatusSnapshot`]
//!
//! [`SyncTool`] is the seam used by the poll worker, so tests can replace
//! the real process with a scripted one.

mod command;
mod tool;

pub use command::Subcommand;
pub use tool::{LOCALE, SyncTool, TOOL_NAME, ToolFuture, YandexDisk};
pub use ydi_status::{StatusSnapshot, parse_status};

/// Errors produced by the CLI adapter.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("yandex-disk executable not found on PATH")]
    ToolNotFound,

    #[error("invalid yandex-disk command: {0}")]
    InvalidCommand(String),

    #[error("failed to run yandex-disk: {0}")]
    Io(#[from] std::io::Error),
}
