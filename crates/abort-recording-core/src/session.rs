//! Recording session state machine.
//!
//! Tracks one recording at a time: which files the host is writing and
//! whether the user asked to abort. The host invokes every transition from a
//! single event loop, so the session is plain owned state threaded through
//! the handlers rather than a shared global.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Lifecycle of a recording as seen by the abort logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No recording in progress.
    Idle,
    /// A recording is in progress.
    Recording,
    /// A recording is in progress and an abort has been requested.
    Aborting,
}

/// Outcome of an abort request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortDecision {
    /// A recording is active and no abort is underway; stop the recording.
    Proceed,
    /// An abort is already in flight; the request is dropped.
    AlreadyAborting,
    /// Nothing is recording; the request is dropped.
    NotRecording,
}

/// State for the recording currently in progress.
///
/// Accumulates the output files the host reports and decides, once the
/// recording stops, whether they are kept (normal stop) or handed back for
/// discarding (abort).
#[derive(Debug)]
pub struct AbortSession {
    phase: SessionPhase,
    output_paths: BTreeSet<PathBuf>,
}

impl AbortSession {
    /// Creates an idle session with no tracked files.
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            output_paths: BTreeSet::new(),
        }
    }

    /// Current phase of the session.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// True while a recording is in progress, aborting or not.
    pub fn is_recording(&self) -> bool {
        self.phase != SessionPhase::Idle
    }

    /// True once an abort has been requested for the active recording.
    pub fn is_aborting(&self) -> bool {
        self.phase == SessionPhase::Aborting
    }

    /// True if at least one output file has been tracked.
    pub fn has_paths(&self) -> bool {
        !self.output_paths.is_empty()
    }

    /// The host reported that a recording began.
    pub fn on_recording_started(&mut self) {
        self.phase = SessionPhase::Recording;
        self.output_paths.clear();
    }

    /// Track a file the recording is writing.
    ///
    /// Returns `false` when the path was already known or no recording is in
    /// progress — the file-change feed is only live during a session.
    pub fn track_path(&mut self, path: PathBuf) -> bool {
        if self.phase == SessionPhase::Idle {
            return false;
        }
        self.output_paths.insert(path)
    }

    /// The user pressed the abort hotkey.
    ///
    /// Transitions Recording → Aborting exactly once; repeated presses while
    /// an abort is underway have no further effect.
    pub fn request_abort(&mut self) -> AbortDecision {
        match self.phase {
            SessionPhase::Idle => AbortDecision::NotRecording,
            SessionPhase::Aborting => AbortDecision::AlreadyAborting,
            SessionPhase::Recording => {
                self.phase = SessionPhase::Aborting;
                AbortDecision::Proceed
            }
        }
    }

    /// The host reported that the recording stopped.
    ///
    /// `final_path` is the file the host named in its stop notification, if
    /// any. Returns the accumulated output paths when the stop concludes an
    /// abort, and an empty list for a normal stop. Phase and path set are
    /// reset unconditionally either way.
    pub fn on_recording_stopped(&mut self, final_path: Option<PathBuf>) -> Vec<PathBuf> {
        if let Some(path) = final_path {
            self.track_path(path);
        }

        let doomed = if self.phase == SessionPhase::Aborting {
            std::mem::take(&mut self.output_paths).into_iter().collect()
        } else {
            self.output_paths.clear();
            Vec::new()
        };

        self.phase = SessionPhase::Idle;

        doomed
    }
}

impl Default for AbortSession {
    fn default() -> Self {
        Self::new()
    }
}
