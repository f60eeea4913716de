//! Output-path discovery.
//!
//! Works out which files a recording is being written to by reading output
//! settings from the host. Two surfaces exist with different reach: the
//! host's own record output is addressable by name the moment a recording
//! starts, while outputs created by other integrations only show up in a
//! full enumeration. Both are modeled as [`RecordingLocator`] implementations
//! over the same [`OutputAccess`] seam.

use crate::{
    error::Result as HostResult,
    host::{OutputAccess, OutputInfo},
};

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

/// Output kind of the host's recording muxer. Only outputs of this kind
/// carry a destination file in their settings.
pub const RECORD_OUTPUT_KIND: &str = "ffmpeg_muxer";

/// Names the host gives its own record output, simple and advanced mode.
const RECORD_OUTPUT_NAMES: [&str; 2] = ["simple_file_output", "adv_file_output"];

/// Settings key holding the muxer's destination file.
const PATH_KEY: &str = "path";

/// Extract the destination file from a muxer settings object.
///
/// Returns `None` when the path cannot be determined; an output without a
/// usable path is skipped, never an error.
pub fn path_from_settings(settings: &Value) -> Option<PathBuf> {
    settings
        .get(PATH_KEY)
        .and_then(Value::as_str)
        .map(normalized_path)
}

/// Normalize separators to the platform convention.
///
/// The host serializes paths with forward slashes even on Windows.
pub fn normalized_path(raw: &str) -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(raw.replace('/', "\\"))
    } else {
        PathBuf::from(raw)
    }
}

/// Locates the files a recording is writing through an [`OutputAccess`].
#[async_trait]
pub trait RecordingLocator {
    /// Destination paths of the recording outputs this surface can reach.
    async fn recording_paths(&self, host: &dyn OutputAccess) -> HostResult<Vec<PathBuf>>;
}

/// Single-output access: reads only the host's own record output.
///
/// Cheap and available as soon as a recording starts, but blind to outputs
/// other integrations create.
#[derive(Debug, Default)]
pub struct RecordOutputLocator;

#[async_trait]
impl RecordingLocator for RecordOutputLocator {
    async fn recording_paths(&self, host: &dyn OutputAccess) -> HostResult<Vec<PathBuf>> {
        let mut paths = Vec::new();

        for name in RECORD_OUTPUT_NAMES {
            let Some(settings) = host.output_settings(name).await? else {
                continue;
            };

            match path_from_settings(&settings) {
                Some(path) => paths.push(path),
                None => debug!(output = name, "record output has no destination path"),
            }
        }

        Ok(paths)
    }
}

/// Full enumeration: every active muxer output the host knows about.
///
/// Catches outputs created by other integrations that the record surface
/// cannot reach. Per-output failures are logged and skipped.
#[derive(Debug, Default)]
pub struct AllOutputsLocator;

#[async_trait]
impl RecordingLocator for AllOutputsLocator {
    async fn recording_paths(&self, host: &dyn OutputAccess) -> HostResult<Vec<PathBuf>> {
        let outputs = host.list_outputs().await?;
        let mut paths = Vec::new();

        for output in outputs
            .iter()
            .filter(|o| o.active && o.kind == RECORD_OUTPUT_KIND)
        {
            match self.output_path(host, output).await {
                Ok(Some(path)) => paths.push(path),
                Ok(None) => {
                    debug!(output = %output.name, "output has no determinable path")
                }
                Err(e) => {
                    warn!(output = %output.name, error = %e, "failed to read output settings")
                }
            }
        }

        Ok(paths)
    }
}

impl AllOutputsLocator {
    async fn output_path(
        &self,
        host: &dyn OutputAccess,
        output: &OutputInfo,
    ) -> HostResult<Option<PathBuf>> {
        let Some(settings) = host.output_settings(&output.name).await? else {
            return Ok(None);
        };

        Ok(path_from_settings(&settings))
    }
}
