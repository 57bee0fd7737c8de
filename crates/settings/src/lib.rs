//! Indicator preferences.
//!
//! Two enumerated options are persisted as JSON next to the
//! `yandex-disk` configuration (`~/.config/yandex-disk/ydi.cfg`):
//!
//! ```json
//! {"icon_theme": "themed", "frequency": "power_saver"}
//! ```
//!
//! [`Settings::load`] is strict and rejects anything it does not
//! recognize; [`SettingsStore`] wraps it for the running indicator and
//! falls back to defaults instead.

mod settings;
mod store;

pub use settings::{Frequency, IconTheme, Settings, default_path};
pub use store::SettingsStore;

/// Errors for settings persistence.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}
