//! Status model for the Yandex.Disk indicator.
//!
//! The `yandex-disk status` command prints a loosely structured
//! `Key: value` report. This crate turns that text into a total
//! [`StatusSnapshot`] and compares two snapshots into an [`UpdateRecord`]
//! holding only what the menu has to redraw.
//!
//! Nothing here performs I/O; invoking the tool lives in `ydi-cli` and
//! scheduling lives in `ydi-monitor`.

mod diff;
mod snapshot;

pub use diff::{Action, Field, FieldUpdate, Icon, UpdateRecord, diff, full};
pub use snapshot::{
    KEY_AVAILABLE, KEY_LAST_DIR, KEY_LAST_FILE, KEY_MAX_FILE, KEY_PATH, KEY_SYNC_PROGRESS,
    KEY_SYNC_STATUS, KEY_TOTAL, KEY_TRASH, KEY_USED, StatusSnapshot, SyncState, parse_status,
};
