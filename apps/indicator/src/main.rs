//! Yandex.Disk indicator entry point.

mod app;
mod instance;
mod launcher;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use ydi_cli::YandexDisk;
use ydi_settings::SettingsStore;

use crate::instance::InstanceLock;

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting Yandex.Disk indicator"
    );

    let lock_path = instance::default_path();
    let Some(lock) = InstanceLock::try_acquire(&lock_path)? else {
        anyhow::bail!(
            "another indicator is already running (lock held on {})",
            lock_path.display()
        );
    };

    tracing::debug!(path = %lock.path().display(), "single instance confirmed");

    let tool = YandexDisk::locate()?;
    let settings = SettingsStore::open(ydi_settings::default_path());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(Arc::new(tool), Arc::new(settings)))?;

    drop(lock);
    tracing::info!("indicator shut down cleanly");
    Ok(())
}
