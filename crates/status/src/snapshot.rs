//! Parsing of the `yandex-disk status` report.

use std::collections::BTreeMap;
use std::fmt;

/// Report key carrying the synchronization core state.
pub const KEY_SYNC_STATUS: &str = "Synchronization core status";
/// Report key present only while a transfer is running.
pub const KEY_SYNC_PROGRESS: &str = "Sync progress";
pub const KEY_PATH: &str = "Path to Yandex.Disk directory";
pub const KEY_TOTAL: &str = "Total";
pub const KEY_USED: &str = "Used";
pub const KEY_AVAILABLE: &str = "Available";
pub const KEY_MAX_FILE: &str = "Max file size";
pub const KEY_TRASH: &str = "Trash size";
/// Repeatable key, one line per recently synchronized file.
pub const KEY_LAST_FILE: &str = "file";
/// Repeatable key, one line per recently synchronized directory.
pub const KEY_LAST_DIR: &str = "directory";

/// Synchronization core state as reported by the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncState {
    Idle,
    Busy,
    Index,
    Paused,
    Error,
}

impl SyncState {
    /// Maps a raw report value to a known state.
    ///
    /// Matching is exact; anything else is treated as "not running".
    pub fn from_report(value: &str) -> Option<Self> {
        match value {
            "idle" => Some(Self::Idle),
            "busy" => Some(Self::Busy),
            "index" => Some(Self::Index),
            "paused" => Some(Self::Paused),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Busy => "busy",
            Self::Index => "index",
            Self::Paused => "paused",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One complete reading of the tool's status report.
///
/// Every field has a default, so a snapshot parsed from empty or garbage
/// output is still fully usable: it simply describes a tool that is not
/// running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// `None` when the key is missing or carries an unknown value.
    pub sync_status: Option<SyncState>,
    pub sync_progress: String,
    pub yd_path: String,
    pub total: String,
    pub used: String,
    pub available: String,
    pub maxfile: String,
    pub trash: String,
    /// Recently synchronized files, in report order.
    pub last_files: Vec<String>,
    /// Recently synchronized directories, in report order.
    pub last_dirs: Vec<String>,
    /// Keys outside the known table, stored verbatim.
    pub extra: BTreeMap<String, String>,
}

impl StatusSnapshot {
    /// Returns `true` if the synchronization core reported a known state.
    pub fn is_running(&self) -> bool {
        self.sync_status.is_some()
    }

    fn insert(&mut self, key: &str, value: &str) {
        match key {
            KEY_SYNC_STATUS => {
                self.sync_status = SyncState::from_report(value);
                if self.sync_status.is_none() {
                    self.extra.insert(key.to_string(), value.to_string());
                }
            }
            KEY_SYNC_PROGRESS => self.sync_progress = value.to_string(),
            KEY_PATH => self.yd_path = value.to_string(),
            KEY_TOTAL => self.total = value.to_string(),
            KEY_USED => self.used = value.to_string(),
            KEY_AVAILABLE => self.available = value.to_string(),
            KEY_MAX_FILE => self.maxfile = value.to_string(),
            KEY_TRASH => self.trash = value.to_string(),
            KEY_LAST_FILE => self.last_files.push(value.to_string()),
            KEY_LAST_DIR => self.last_dirs.push(value.to_string()),
            _ => {
                self.extra.insert(key.to_string(), value.to_string());
            }
        }
    }
}

/// Parses raw `status` output into a snapshot.
///
/// Each non-blank line is split on its first colon. Keys are trimmed and
/// matched exactly; values are trimmed and stripped of surrounding single
/// quotes. A line without a colon is kept as a key with an empty value.
/// This never fails.
pub fn parse_status(raw: &str) -> StatusSnapshot {
    let mut snapshot = StatusSnapshot::default();

    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let (key, value) = line.split_once(':').unwrap_or((line, ""));
        let key = key.trim();
        let value = value.trim().trim_matches('\'');
        snapshot.insert(key, value);
    }

    snapshot
}
