//! Tray side of the Yandex.Disk indicator.
//!
//! Holds the menu model and the channel interface between the indicator
//! core and whatever draws the tray icon:
//! - [`TrayUpdate`]: core to tray (status changes, messages, shutdown)
//! - [`TrayEvent`]: tray to core (menu clicks)
//!
//! The icon itself is drawn by a platform backend (AppIndicator /
//! StatusNotifierItem on Linux). This crate stays backend-agnostic: the
//! backend owns a [`MenuState`], feeds it updates and turns clicks into
//! events with [`MenuState::activate`].

mod icon;
mod menu;
mod tray;

pub use icon::{IconSet, icon_file};
pub use menu::{
    EMPTY_LIST, MenuAction, MenuItem, MenuState, START_LABEL, STOP_LABEL, format_entries,
};
pub use tray::{MessageKind, TrayConfig, TrayEvent, TrayHandle, TrayUpdate, pump_updates};
