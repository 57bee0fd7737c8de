//! Opens the Yandex.Disk folder in a file manager.

use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Supported file managers, in order of preference.
pub const FILE_MANAGERS: [&str; 3] = ["nautilus", "thunar", "pcmanfm"];

pub const NOT_FOUND_TITLE: &str = "File Manager not found";
pub const NOT_FOUND_BODY: &str =
    "Nautilus, Thunar and PCmanFM file managers are suported, none found";

/// Returns the first supported file manager `lookup` can resolve.
fn first_available(lookup: impl Fn(&str) -> Option<PathBuf>) -> Option<PathBuf> {
    FILE_MANAGERS.iter().find_map(|name| lookup(name))
}

pub fn find_file_manager() -> Option<PathBuf> {
    first_available(|name| which::which(name).ok())
}

/// Spawns a file manager on `folder` without waiting for it.
///
/// Returns `Ok(false)` if no supported file manager is installed.
pub fn open_folder(folder: &Path) -> std::io::Result<bool> {
    let Some(program) = find_file_manager() else {
        tracing::warn!("no supported file manager found");
        return Ok(false);
    };

    tracing::info!(
        program = %program.display(),
        folder = %folder.display(),
        "opening folder"
    );
    tokio::process::Command::new(&program)
        .arg(folder)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(true)
}
