//! Icon files and icon set selection.

use std::path::{Path, PathBuf};

use ydi_settings::IconTheme;
use ydi_status::Icon;

/// File name of the tray icon for `icon`, relative to an icon set directory.
pub fn icon_file(icon: Icon) -> &'static str {
    match icon {
        Icon::Normal => "YDNormal.png",
        Icon::Syncing => "YDSync.png",
        Icon::Paused => "YDPaused.png",
        Icon::Error => "YDError.png",
        Icon::Disconnected => "YDDisconnect.png",
    }
}

/// One of the two shipped icon sets.
///
/// Named after the desktop theme they are drawn for: `Dark` holds white
/// icons, `Light` holds black ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSet {
    Light,
    Dark,
}

impl IconSet {
    /// Picks the icon set for a preference and the current desktop theme
    /// name (e.g. `Adwaita-dark`).
    pub fn resolve(theme: IconTheme, desktop_theme: Option<&str>) -> Self {
        match theme {
            IconTheme::Themed => match desktop_theme {
                Some(name) if name.contains("dark") || name.contains("Dark") => Self::Dark,
                _ => Self::Light,
            },
            IconTheme::White => Self::Dark,
            IconTheme::Black => Self::Light,
        }
    }

    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Light => "Light_Theme",
            Self::Dark => "Dark_Theme",
        }
    }

    /// Full path of `icon` in this set under `root`.
    pub fn path(&self, root: &Path, icon: Icon) -> PathBuf {
        root.join(self.dir_name()).join(icon_file(icon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themed_follows_desktop_theme() {
        assert_eq!(
            IconSet::resolve(IconTheme::Themed, Some("Adwaita-dark")),
            IconSet::Dark
        );
        assert_eq!(
            IconSet::resolve(IconTheme::Themed, Some("Yaru-Dark")),
            IconSet::Dark
        );
        assert_eq!(
            IconSet::resolve(IconTheme::Themed, Some("Adwaita")),
            IconSet::Light
        );
        assert_eq!(IconSet::resolve(IconTheme::Themed, None), IconSet::Light);
    }

    #[test]
    fn fixed_themes_ignore_desktop() {
        for desktop in [None, Some("Adwaita"), Some("Adwaita-dark")] {
            assert_eq!(IconSet::resolve(IconTheme::White, desktop), IconSet::Dark);
            assert_eq!(IconSet::resolve(IconTheme::Black, desktop), IconSet::Light);
        }
    }

    #[test]
    fn icon_paths() {
        let path = IconSet::Dark.path(Path::new("/opt/ydi/Icons"), Icon::Syncing);
        assert_eq!(path, Path::new("/opt/ydi/Icons/Dark_Theme/YDSync.png"));
        assert_eq!(icon_file(Icon::Disconnected), "YDDisconnect.png");
    }
}
