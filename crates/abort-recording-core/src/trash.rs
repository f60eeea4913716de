//! Trash dispatch for aborted recordings.
//!
//! Files are moved to the platform trash, never deleted outright. A failure
//! on one file is caught and logged without interrupting the rest of the
//! batch.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

/// Destination for discarded files.
///
/// The real implementation is [`SystemTrash`]; tests substitute their own to
/// exercise the dispatch logic without touching the user's trash.
pub trait TrashSink {
    /// Move `path` to the trash.
    ///
    /// # Errors
    ///
    /// Returns the underlying platform error when the move fails.
    fn send(&mut self, path: &Path) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// The operating system trash.
#[derive(Debug, Default)]
pub struct SystemTrash;

impl TrashSink for SystemTrash {
    fn send(&mut self, path: &Path) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        trash::delete(path).map_err(Into::into)
    }
}

/// Per-file outcomes of one discard batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiscardReport {
    /// Files moved to the trash.
    pub trashed: Vec<PathBuf>,
    /// Paths that never materialized as files and were skipped.
    pub missing: Vec<PathBuf>,
    /// Files whose trash move failed.
    pub failed: Vec<PathBuf>,
}

impl DiscardReport {
    /// True when the batch produced no outcomes at all.
    pub fn is_empty(&self) -> bool {
        self.trashed.is_empty() && self.missing.is_empty() && self.failed.is_empty()
    }
}

/// Move every path that exists as a file to the trash.
///
/// Paths whose existence check fails are skipped — a zero-duration recording
/// may never have written its file. Each surviving path is attempted
/// independently; a failed move is logged and counted, and the loop carries
/// on with the remaining files.
#[instrument(skip(sink, paths))]
pub fn discard_files<S: TrashSink>(sink: &mut S, paths: Vec<PathBuf>) -> DiscardReport {
    let mut report = DiscardReport::default();

    for path in paths {
        if !path.is_file() {
            debug!(path = ?path, "skipping path that was never written");
            report.missing.push(path);
            continue;
        }

        match sink.send(&path) {
            Ok(()) => {
                info!(path = ?path, "sent to trash");
                report.trashed.push(path);
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "unable to send file to trash");
                report.failed.push(path);
            }
        }
    }

    report
}
