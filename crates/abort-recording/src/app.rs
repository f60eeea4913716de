use crate::{
    AppCommand, AppResult, ControlEvent, capabilities, config::Config, config_watcher::ConfigWatcher,
};

use std::path::PathBuf;

use abort_recording_core::{
    AbortDecision, AbortSession, AllOutputsLocator, HostClient, HostEvent, RecordOutputLocator,
    RecordingLocator, SystemTrash, discard_files,
};
use tao::event_loop::EventLoopProxy;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Main application state.
///
/// Runs on the async runtime thread. All recording lifecycle handling is
/// serialized through one `select!` loop, so the session state machine is
/// never entered concurrently. Hotkey swaps go back to the main thread via
/// the event-loop proxy because registration lives there.
pub struct App {
    pub(crate) session: AbortSession,
    pub(crate) session_id: Option<Uuid>,
    pub(crate) host: HostClient,
    pub(crate) host_events: mpsc::Receiver<HostEvent>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) proxy: EventLoopProxy<ControlEvent>,
    pub(crate) hotkey_id_tx: watch::Sender<u32>,
    pub(crate) config: Config,
    pub(crate) config_path: PathBuf,
}

impl App {
    /// Run the main application event loop.
    ///
    /// # Errors
    ///
    /// Currently infallible; the signature leaves room for setup failures.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Abort Recording starting");
        info!("{}", capabilities::ABOUT);

        // Config edits nudge this channel; a failed watcher is not fatal,
        // binding changes then just need a restart.
        let (nudge_tx, mut nudge_rx) = mpsc::channel(8);
        let _watcher = match ConfigWatcher::spawn(self.config_path.clone(), nudge_tx) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!(error = ?e, "Config watcher unavailable; hotkey changes need a restart");
                None
            }
        };

        // A recording may already be running when we attach; the abort
        // hotkey has to work for it too.
        match self.host.record_status().await {
            Ok(status) if status.output_active => {
                info!("Recording already in progress at startup");
                self.handle_host_event(HostEvent::RecordingStarted).await;
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Could not query initial record status"),
        }

        loop {
            tokio::select! {
                maybe_event = self.host_events.recv() => match maybe_event {
                    Some(event) => self.handle_host_event(event).await,
                    None => {
                        error!("Lost connection to the host, shutting down");
                        break;
                    }
                },

                Some(cmd) = self.command_rx.recv() => match cmd {
                    AppCommand::AbortRecording => self.handle_abort().await,
                },

                Some(()) = nudge_rx.recv() => self.handle_config_change(),

                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received, shutting down");
                    break;
                }
            }
        }

        let _ = self.shutdown_tx.send(true);
        info!("Abort Recording shut down");

        Ok(())
    }

    /// React to a recording lifecycle event from the host.
    #[instrument(skip(self))]
    async fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::RecordingStarted => {
                let session_id = Uuid::new_v4();
                self.session_id = Some(session_id);
                self.session.on_recording_started();

                // The host's own record output is addressable right away;
                // outputs added by other integrations are swept at abort time.
                match RecordOutputLocator.recording_paths(&self.host).await {
                    Ok(paths) if paths.is_empty() => {
                        warn!(session_id = %session_id, "Record output has no destination path")
                    }
                    Ok(paths) => {
                        for path in paths {
                            debug!(session_id = %session_id, path = ?path, "Tracking output file");
                            self.session.track_path(path);
                        }
                    }
                    Err(e) => {
                        warn!(session_id = %session_id, error = %e, "Could not read record output settings")
                    }
                }

                info!(session_id = %session_id, "Recording started");
            }

            HostEvent::RecordingFileChanged { path } => {
                debug!(path = ?path, "Recording rolled over to a new file");
                self.session.track_path(path);
            }

            HostEvent::RecordingStopped { path } => {
                let was_aborting = self.session.is_aborting();
                let doomed = self.session.on_recording_stopped(path);
                let session_id = self.session_id.take();

                if !was_aborting {
                    info!(session_id = ?session_id, "Recording stopped, files kept");
                    return;
                }

                if doomed.is_empty() {
                    warn!("Abort finished with no files to discard");
                    return;
                }

                info!(files = doomed.len(), "Recording aborted, discarding files");

                // Existence checks and trash moves are synchronous platform
                // calls; keep them off the event loop.
                let outcome =
                    tokio::task::spawn_blocking(move || discard_files(&mut SystemTrash, doomed))
                        .await;

                match outcome {
                    Ok(report) => info!(
                        trashed = report.trashed.len(),
                        missing = report.missing.len(),
                        failed = report.failed.len(),
                        "Discard complete"
                    ),
                    Err(e) => error!(error = ?e, "Discard task panicked"),
                }
            }
        }
    }

    /// React to the abort hotkey.
    #[instrument(skip(self))]
    async fn handle_abort(&mut self) {
        match self.session.request_abort() {
            AbortDecision::NotRecording => {
                debug!("Abort hotkey ignored, no active recording");
            }
            AbortDecision::AlreadyAborting => {
                debug!("Abort already underway");
            }
            AbortDecision::Proceed => {
                // Sweep every active output now — other integrations may have
                // added outputs that were not visible at recording start.
                match AllOutputsLocator.recording_paths(&self.host).await {
                    Ok(paths) => {
                        for path in paths {
                            self.session.track_path(path);
                        }
                    }
                    Err(e) => warn!(error = %e, "Output sweep failed"),
                }

                if !self.session.has_paths() {
                    warn!("No output paths found, cannot determine recording files");
                }

                info!("Stopping recording");
                match self.host.stop_record().await {
                    Ok(Some(path)) => {
                        self.session.track_path(path);
                    }
                    Ok(None) => {}
                    Err(e) => error!(error = %e, "Failed to stop the recording"),
                }
            }
        }
    }

    /// Reload the config after a file change and rebind the hotkey if needed.
    #[instrument(skip(self))]
    fn handle_config_change(&mut self) {
        let config = match Config::load() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = ?e, "Ignoring unreadable config change");
                return;
            }
        };

        if config.host != self.config.host {
            info!("Host settings changed, they apply on the next start");
        }

        if config.hotkey != self.config.hotkey {
            match config.hotkey.hotkey() {
                Ok(hotkey) => {
                    // New id first so no press of the new key is missed,
                    // then the main thread swaps the registration.
                    let _ = self.hotkey_id_tx.send(hotkey.id());
                    if self.proxy.send_event(ControlEvent::Rebind(hotkey)).is_err() {
                        warn!("Main thread gone, cannot rebind hotkey");
                        return;
                    }
                    info!(binding = %config.hotkey.binding, "Abort hotkey rebound");
                }
                Err(e) => {
                    // Keep the old config so a corrected file still registers
                    // as a change.
                    warn!(error = ?e, "New hotkey binding is invalid, keeping the old one");
                    return;
                }
            }
        }

        self.config = config;
    }
}
