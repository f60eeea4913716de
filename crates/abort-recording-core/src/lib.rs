//! Abort Recording Core Library
//!
//! Session state machine, output discovery, and trash dispatch for aborting
//! a recording, plus the websocket client that talks to the recording host.
//!
//! # Example
//!
//! ```no_run
//! use abort_recording_core::{AbortDecision, AbortSession};
//!
//! let mut session = AbortSession::new();
//!
//! session.on_recording_started();
//! session.track_path("/rec/video.mp4".into());
//!
//! assert_eq!(session.request_abort(), AbortDecision::Proceed);
//! let doomed = session.on_recording_stopped(None);
//! assert_eq!(doomed.len(), 1);
//! ```

mod discovery;
mod error;
mod host;
mod session;
mod trash;

pub use {
    discovery::{
        AllOutputsLocator, RECORD_OUTPUT_KIND, RecordOutputLocator, RecordingLocator,
        normalized_path, path_from_settings,
    },
    error::{HostError, Result as HostResult},
    host::{
        HostClient, HostEndpoint, HostEvent, HostVersion, OutputAccess, OutputInfo, RecordStatus,
    },
    session::{AbortDecision, AbortSession, SessionPhase},
    trash::{DiscardReport, SystemTrash, TrashSink, discard_files},
};

#[cfg(test)]
mod tests;
