//! Settings values and their on-disk format.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::SettingsError;

/// Status update frequency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    PowerSaver,
    Medium,
    High,
}

impl Frequency {
    /// Sleep between two status polls.
    pub fn interval(&self) -> Duration {
        match self {
            Self::PowerSaver => Duration::from_secs(5),
            Self::Medium => Duration::from_secs(2),
            Self::High => Duration::from_secs(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PowerSaver => "power_saver",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Frequency {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "power_saver" => Ok(Self::PowerSaver),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(SettingsError::Invalid(format!("unknown frequency {other:?}"))),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which icon set the tray uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconTheme {
    /// Follow the desktop theme (light or dark).
    #[default]
    Themed,
    /// Always white icons, for dark panels.
    White,
    /// Always black icons, for light panels.
    Black,
}

impl IconTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Themed => "themed",
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl FromStr for IconTheme {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "themed" => Ok(Self::Themed),
            "white" => Ok(Self::White),
            "black" => Ok(Self::Black),
            other => Err(SettingsError::Invalid(format!("unknown icon theme {other:?}"))),
        }
    }
}

impl fmt::Display for IconTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indicator preferences.
///
/// Both keys are required on disk; unknown extra keys are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub icon_theme: IconTheme,
    pub frequency: Frequency,
}

impl Settings {
    /// Loads settings from `path`.
    ///
    /// A missing file yields defaults (fresh installation). A file that
    /// cannot be parsed, lacks a key or carries an unknown value is
    /// rejected with [`SettingsError::Invalid`].
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content)
            .map_err(|e| SettingsError::Invalid(format!("{}: {e}", path.display())))
    }

    /// Writes settings to `path`, creating the parent directory.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string(self)
            .map_err(|e| SettingsError::Invalid(format!("serialize: {e}")))?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}

/// Returns the settings file path: `~/.config/yandex-disk/ydi.cfg`.
pub fn default_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home)
        .join(".config")
        .join("yandex-disk")
        .join("ydi.cfg")
}
