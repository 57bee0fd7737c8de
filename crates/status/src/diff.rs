//! Snapshot comparison and the update records it produces.

use crate::snapshot::{StatusSnapshot, SyncState};

/// Indicator icon derived from the synchronization state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Normal,
    Syncing,
    Paused,
    Error,
    Disconnected,
}

impl Icon {
    pub fn for_state(state: Option<SyncState>) -> Self {
        match state {
            Some(SyncState::Idle) => Self::Normal,
            Some(SyncState::Busy | SyncState::Index) => Self::Syncing,
            Some(SyncState::Paused) => Self::Paused,
            Some(SyncState::Error) => Self::Error,
            None => Self::Disconnected,
        }
    }
}

/// The action offered by the start/stop menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Start,
    Stop,
}

impl Action {
    /// `Stop` while the daemon reports any state, `Start` otherwise.
    pub fn for_state(state: Option<SyncState>) -> Self {
        if state.is_some() {
            Self::Stop
        } else {
            Self::Start
        }
    }
}

/// Identifies a field of an [`UpdateRecord`] without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Icon,
    Action,
    Status,
    Path,
    Total,
    Used,
    Available,
    MaxFile,
    Trash,
    LastFiles,
    LastDirs,
}

/// A single changed field carrying its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Icon(Icon),
    Action(Action),
    /// Display text: `Status: <state>` plus the progress line if any.
    Status(String),
    Path(String),
    Total(String),
    Used(String),
    Available(String),
    MaxFile(String),
    Trash(String),
    LastFiles(Vec<String>),
    LastDirs(Vec<String>),
}

impl FieldUpdate {
    pub fn field(&self) -> Field {
        match self {
            Self::Icon(_) => Field::Icon,
            Self::Action(_) => Field::Action,
            Self::Status(_) => Field::Status,
            Self::Path(_) => Field::Path,
            Self::Total(_) => Field::Total,
            Self::Used(_) => Field::Used,
            Self::Available(_) => Field::Available,
            Self::MaxFile(_) => Field::MaxFile,
            Self::Trash(_) => Field::Trash,
            Self::LastFiles(_) => Field::LastFiles,
            Self::LastDirs(_) => Field::LastDirs,
        }
    }
}

/// The minimal set of menu changes between two snapshots.
///
/// Updates are kept in a fixed field order. An empty record means nothing
/// changed and must be treated as a no-op by consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRecord {
    updates: Vec<FieldUpdate>,
}

impl UpdateRecord {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldUpdate> {
        self.updates.iter()
    }

    /// Returns the update for `field`, if it changed.
    pub fn get(&self, field: Field) -> Option<&FieldUpdate> {
        self.updates.iter().find(|u| u.field() == field)
    }

    /// Returns the changed fields in record order.
    pub fn fields(&self) -> Vec<Field> {
        self.updates.iter().map(FieldUpdate::field).collect()
    }
}

impl IntoIterator for UpdateRecord {
    type Item = FieldUpdate;
    type IntoIter = std::vec::IntoIter<FieldUpdate>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.into_iter()
    }
}

impl<'a> IntoIterator for &'a UpdateRecord {
    type Item = &'a FieldUpdate;
    type IntoIter = std::slice::Iter<'a, FieldUpdate>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.iter()
    }
}

impl StatusSnapshot {
    pub fn icon(&self) -> Icon {
        Icon::for_state(self.sync_status)
    }

    pub fn action(&self) -> Action {
        Action::for_state(self.sync_status)
    }

    /// Status line as shown at the top of the menu.
    pub fn status_line(&self) -> String {
        let state = self
            .sync_status
            .map(|s| s.as_str())
            .unwrap_or("not running");
        if self.sync_progress.is_empty() {
            format!("Status: {state}")
        } else {
            format!("Status: {state}\n{}", self.sync_progress)
        }
    }

    /// Every tracked field, derived ones first, in record order.
    fn field_updates(&self) -> [FieldUpdate; 11] {
        [
            FieldUpdate::Icon(self.icon()),
            FieldUpdate::Action(self.action()),
            FieldUpdate::Status(self.status_line()),
            FieldUpdate::Path(self.yd_path.clone()),
            FieldUpdate::Total(self.total.clone()),
            FieldUpdate::Used(self.used.clone()),
            FieldUpdate::Available(self.available.clone()),
            FieldUpdate::MaxFile(self.maxfile.clone()),
            FieldUpdate::Trash(self.trash.clone()),
            FieldUpdate::LastFiles(self.last_files.clone()),
            FieldUpdate::LastDirs(self.last_dirs.clone()),
        ]
    }
}

/// Compares two snapshots and returns the fields of `new` that differ.
///
/// Lists compare by full ordered equality; when they differ the whole new
/// list is emitted. Derived fields (icon, action, status line) are emitted
/// only when their rendered value changes.
pub fn diff(old: &StatusSnapshot, new: &StatusSnapshot) -> UpdateRecord {
    let updates = old
        .field_updates()
        .into_iter()
        .zip(new.field_updates())
        .filter(|(before, after)| before != after)
        .map(|(_, after)| after)
        .collect();
    UpdateRecord { updates }
}

/// Every field of `snapshot`, for a consumer with no prior state.
pub fn full(snapshot: &StatusSnapshot) -> UpdateRecord {
    UpdateRecord {
        updates: snapshot.field_updates().into(),
    }
}
