//! Dynamic context menu for the indicator.

use std::path::PathBuf;

use ydi_settings::{Frequency, IconTheme};
use ydi_status::{Action, FieldUpdate, Icon, UpdateRecord};

use crate::icon::IconSet;
use crate::tray::{TrayConfig, TrayEvent};

/// Start/stop item label while the daemon is stopped.
pub const START_LABEL: &str = "Start \u{23F5}\u{FE0E}";
/// Start/stop item label while the daemon is running.
pub const STOP_LABEL: &str = "Stop \u{23F9}\u{FE0E}";
/// Rendered in place of an empty recently-synced list.
pub const EMPTY_LIST: &str = "  (none)";

const MAX_ENTRY_WIDTH: usize = 47;
const KEPT_ENDS: usize = 20;
const ELLIPSIS: &str = " ... ";
const INDENT: &str = "  ";

/// Actions that can be triggered from the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    StartStop,
    OpenFolder,
    SetFrequency(Frequency),
    SetIconTheme(IconTheme),
    About,
    Quit,
}

/// A single menu item.
#[derive(Debug, Clone, Default)]
pub struct MenuItem {
    /// Display text. Empty for separators.
    pub label: String,
    /// Whether the item is enabled (clickable).
    pub enabled: bool,
    /// Optional action triggered on click.
    pub action: Option<MenuAction>,
    /// Radio state, `None` for plain items.
    pub checked: Option<bool>,
    /// Submenu entries.
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    fn text(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    fn action(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            enabled: true,
            action: Some(action),
            ..Self::default()
        }
    }

    fn radio(label: &str, action: MenuAction, checked: bool) -> Self {
        Self {
            checked: Some(checked),
            ..Self::action(label, action)
        }
    }

    fn submenu(label: &str, children: Vec<MenuItem>) -> Self {
        Self {
            label: label.into(),
            enabled: true,
            children,
            ..Self::default()
        }
    }

    fn separator() -> Self {
        Self::default()
    }

    pub fn is_separator(&self) -> bool {
        self.label.is_empty() && self.children.is_empty()
    }
}

/// Renders a recently-synced list as one menu label.
///
/// Entries longer than 47 characters keep their first and last 20
/// characters around ` ... `. Every entry is indented by two spaces.
pub fn format_entries(entries: &[String]) -> String {
    if entries.is_empty() {
        return EMPTY_LIST.to_string();
    }

    entries
        .iter()
        .map(|entry| {
            let chars: Vec<char> = entry.chars().collect();
            if chars.len() > MAX_ENTRY_WIDTH {
                let head: String = chars[..KEPT_ENDS].iter().collect();
                let tail: String = chars[chars.len() - KEPT_ENDS..].iter().collect();
                format!("{INDENT}{head}{ELLIPSIS}{tail}")
            } else {
                format!("{INDENT}{entry}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Everything the menu shows, kept current from update records.
#[derive(Debug, Clone)]
pub struct MenuState {
    pub icon: Icon,
    pub action: Action,
    pub status: String,
    pub path: String,
    pub total: String,
    pub used: String,
    pub available: String,
    pub max_file: String,
    pub trash: String,
    pub last_files: Vec<String>,
    pub last_dirs: Vec<String>,
    pub frequency: Frequency,
    pub icon_theme: IconTheme,
    icon_root: PathBuf,
    desktop_theme: Option<String>,
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new(&TrayConfig::default())
    }
}

impl MenuState {
    pub fn new(config: &TrayConfig) -> Self {
        Self {
            icon: Icon::Disconnected,
            action: Action::Start,
            status: "Status: not running".into(),
            path: String::new(),
            total: String::new(),
            used: String::new(),
            available: String::new(),
            max_file: String::new(),
            trash: String::new(),
            last_files: Vec::new(),
            last_dirs: Vec::new(),
            frequency: config.frequency,
            icon_theme: config.icon_theme,
            icon_root: config.icon_root.clone(),
            desktop_theme: config.desktop_theme.clone(),
        }
    }

    /// Applies every field of `record`. Applying the same record twice
    /// leaves the state unchanged.
    pub fn apply(&mut self, record: &UpdateRecord) {
        for update in record {
            match update {
                FieldUpdate::Icon(icon) => self.icon = *icon,
                FieldUpdate::Action(action) => self.action = *action,
                FieldUpdate::Status(s) => self.status.clone_from(s),
                FieldUpdate::Path(s) => self.path.clone_from(s),
                FieldUpdate::Total(s) => self.total.clone_from(s),
                FieldUpdate::Used(s) => self.used.clone_from(s),
                FieldUpdate::Available(s) => self.available.clone_from(s),
                FieldUpdate::MaxFile(s) => self.max_file.clone_from(s),
                FieldUpdate::Trash(s) => self.trash.clone_from(s),
                FieldUpdate::LastFiles(list) => self.last_files.clone_from(list),
                FieldUpdate::LastDirs(list) => self.last_dirs.clone_from(list),
            }
        }
    }

    pub fn set_desktop_theme(&mut self, name: Option<String>) {
        self.desktop_theme = name;
    }

    pub fn icon_set(&self) -> IconSet {
        IconSet::resolve(self.icon_theme, self.desktop_theme.as_deref())
    }

    /// Path of the icon to display right now.
    pub fn icon_path(&self) -> PathBuf {
        self.icon_set().path(&self.icon_root, self.icon)
    }

    pub fn start_stop_label(&self) -> &'static str {
        match self.action {
            Action::Start => START_LABEL,
            Action::Stop => STOP_LABEL,
        }
    }

    /// Turns a click into the event the core should handle.
    ///
    /// Radio choices are recorded immediately so the menu reflects them
    /// before the core confirms. Opening the folder is a no-op while the
    /// path is unknown.
    pub fn activate(&mut self, action: MenuAction) -> Option<TrayEvent> {
        match action {
            MenuAction::StartStop => Some(match self.action {
                Action::Start => TrayEvent::StartRequested,
                Action::Stop => TrayEvent::StopRequested,
            }),
            MenuAction::OpenFolder if self.path.is_empty() => None,
            MenuAction::OpenFolder => Some(TrayEvent::OpenFolder(PathBuf::from(&self.path))),
            MenuAction::SetFrequency(f) => {
                self.frequency = f;
                Some(TrayEvent::SetFrequency(f))
            }
            MenuAction::SetIconTheme(t) => {
                self.icon_theme = t;
                Some(TrayEvent::SetIconTheme(t))
            }
            MenuAction::About => Some(TrayEvent::About),
            MenuAction::Quit => Some(TrayEvent::Quit),
        }
    }

    /// Builds the menu items from the current state.
    pub fn build_menu(&self) -> Vec<MenuItem> {
        let quota = vec![
            MenuItem::text("Path to Yandex Disk folder:"),
            MenuItem {
                enabled: !self.path.is_empty(),
                ..MenuItem::action(format!("{INDENT}{}", self.path), MenuAction::OpenFolder)
            },
            MenuItem::separator(),
            MenuItem::text(format!("Total: {}", self.total)),
            MenuItem::text(format!("Used: {}", self.used)),
            MenuItem::text(format!("Available: {}", self.available)),
            MenuItem::text(format!("Max file: {}", self.max_file)),
            MenuItem::text(format!("Trash: {}", self.trash)),
        ];

        let recent = vec![
            MenuItem::text("Recently synced files:"),
            MenuItem::text(format_entries(&self.last_files)),
            MenuItem::text("Recently synced folders:"),
            MenuItem::text(format_entries(&self.last_dirs)),
        ];

        let f = self.frequency;
        let t = self.icon_theme;
        let preferences = vec![
            MenuItem::text("Update frequency:"),
            MenuItem::radio(
                "Power saver",
                MenuAction::SetFrequency(Frequency::PowerSaver),
                f == Frequency::PowerSaver,
            ),
            MenuItem::radio(
                "Medium",
                MenuAction::SetFrequency(Frequency::Medium),
                f == Frequency::Medium,
            ),
            MenuItem::radio(
                "High",
                MenuAction::SetFrequency(Frequency::High),
                f == Frequency::High,
            ),
            MenuItem::separator(),
            MenuItem::text("Icon theme:"),
            MenuItem::radio(
                "Follow desktop theme",
                MenuAction::SetIconTheme(IconTheme::Themed),
                t == IconTheme::Themed,
            ),
            MenuItem::radio(
                "Always white",
                MenuAction::SetIconTheme(IconTheme::White),
                t == IconTheme::White,
            ),
            MenuItem::radio(
                "Always black",
                MenuAction::SetIconTheme(IconTheme::Black),
                t == IconTheme::Black,
            ),
        ];

        vec![
            MenuItem::text(self.status.clone()),
            MenuItem::separator(),
            MenuItem::submenu("Quota", quota),
            MenuItem::submenu("Recently synced", recent),
            MenuItem::separator(),
            MenuItem::action(self.start_stop_label(), MenuAction::StartStop),
            MenuItem::submenu("Preferences...", preferences),
            MenuItem::separator(),
            MenuItem::action("About", MenuAction::About),
            MenuItem::action("Exit", MenuAction::Quit),
        ]
    }
}
