//! Shared, persisted settings for the running indicator.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::settings::{Frequency, IconTheme, Settings};

/// Settings shared between the UI side and the poll coordinator.
///
/// Reads and writes go through an async mutex so the coordinator never
/// observes a half-applied change. Every change is written to disk; a
/// failed write is logged and otherwise ignored.
pub struct SettingsStore {
    path: PathBuf,
    current: Mutex<Settings>,
}

impl SettingsStore {
    /// Loads settings from `path`, falling back to defaults if the file is
    /// unreadable or invalid.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = match Settings::load(&path) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(path = %path.display(), "settings rejected, using defaults: {e}");
                Settings::default()
            }
        };
        tracing::info!(
            frequency = %current.frequency,
            icon_theme = %current.icon_theme,
            "settings loaded"
        );
        Self::with_settings(path, current)
    }

    /// Creates a store with known settings without touching the disk.
    pub fn with_settings(path: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            path: path.into(),
            current: Mutex::new(settings),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self) -> Settings {
        *self.current.lock().await
    }

    pub async fn frequency(&self) -> Frequency {
        self.current.lock().await.frequency
    }

    pub async fn icon_theme(&self) -> IconTheme {
        self.current.lock().await.icon_theme
    }

    pub async fn set_frequency(&self, frequency: Frequency) {
        let mut current = self.current.lock().await;
        current.frequency = frequency;
        self.persist(&current);
    }

    pub async fn set_icon_theme(&self, icon_theme: IconTheme) {
        let mut current = self.current.lock().await;
        current.icon_theme = icon_theme;
        self.persist(&current);
    }

    fn persist(&self, settings: &Settings) {
        if let Err(e) = settings.save(&self.path) {
            tracing::warn!(path = %self.path.display(), "failed to save settings: {e}");
        }
    }
}
