//! Watches the configuration file for edits.
//!
//! Sends a unit nudge whenever the file changes; the application reloads the
//! config and, when the binding changed, swaps the hotkey registration on
//! the main thread. Dropping the watcher stops the notifications.

use crate::{AppError, AppResult};

use std::{
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Keeps the filesystem watcher alive for the app's lifetime.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    /// Watch `config_path` and nudge `nudge_tx` on every change.
    ///
    /// The parent directory is watched rather than the file itself —
    /// atomic saves replace the inode, which file-level watches lose
    /// track of.
    ///
    /// # Errors
    ///
    /// Returns a `WatcherError` when the platform watcher cannot be set up.
    #[track_caller]
    pub fn spawn(config_path: PathBuf, nudge_tx: mpsc::Sender<()>) -> AppResult<Self> {
        let dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| AppError::WatcherError {
                reason: "config path has no parent directory".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mut watcher =
            notify::recommended_watcher(move |result: notify::Result<Event>| match result {
                Ok(event) if touches(&event, &config_path) => {
                    // The watcher runs on its own thread, so a blocking send
                    // into the async world is fine here.
                    let _ = nudge_tx.blocking_send(());
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "config watcher error"),
            })
            .map_err(|e| AppError::WatcherError {
                reason: format!("Failed to create watcher: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| AppError::WatcherError {
                reason: format!("Failed to watch {:?}: {}", dir, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(dir = ?dir, "Watching configuration directory");

        Ok(Self { _watcher: watcher })
    }
}

fn touches(event: &Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}
