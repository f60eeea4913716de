//! Abort Recording: a panic button for OBS Studio recordings.
//!
//! A global hotkey stops the in-progress recording and moves every file it
//! produced to the system trash instead of keeping it.

mod app;
mod app_command;
mod capabilities;
mod config;
mod config_watcher;
mod control_event;
mod error;
mod hotkey_handler;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    control_event::ControlEvent,
    error::{AppError, Result as AppResult},
    hotkey_handler::HotkeyHandler,
};

use crate::config::Config;

use abort_recording_core::{AbortSession, HostClient};
use global_hotkey::{GlobalHotKeyManager, hotkey::HotKey};
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("abort_recording=debug,abort_recording_core=debug")
        .init();

    let event_loop = EventLoopBuilder::<ControlEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    // Persists across event loop iterations — dropping it unregisters the hotkey.
    let mut hotkey_manager: Option<GlobalHotKeyManager> = None;
    let mut registered: Option<HotKey> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => {
                match cmd {
                    ControlEvent::Rebind(hotkey) => {
                        if let Some(manager) = &hotkey_manager {
                            if let Some(old) = registered.take() {
                                if let Err(e) = manager.unregister(old) {
                                    warn!(error = %e, "Failed to unregister old hotkey");
                                }
                            }
                            match manager.register(hotkey) {
                                Ok(()) => {
                                    registered = Some(hotkey);
                                    info!(hotkey = ?hotkey, "Hotkey registration swapped");
                                }
                                Err(e) => {
                                    error!(error = %e, "Failed to register replacement hotkey")
                                }
                            }
                        }
                    }
                    ControlEvent::Shutdown => {
                        *control_flow = ControlFlow::ExitWithCode(0);
                    }
                }
                return;
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                // Capability gate: a missing piece leaves the app loaded but
                // inert. The hotkey is never registered and the log carries
                // remediation text instead.
                let config_path = match Config::path() {
                    Ok(path) => path,
                    Err(e) => {
                        error!(error = ?e, "No usable config location; running inert");
                        return;
                    }
                };

                let config = match Config::load() {
                    Ok(config) => config,
                    Err(e) => {
                        error!(error = ?e, "Failed to load config; running inert");
                        info!("Fix or delete {:?} and restart", config_path);
                        return;
                    }
                };

                if let Err(reason) = capabilities::trash_available() {
                    error!(%reason, "Trash facility unavailable; running inert");
                    return;
                }

                let hotkey = match config.hotkey.hotkey() {
                    Ok(hotkey) => hotkey,
                    Err(e) => {
                        error!(error = ?e, "Invalid hotkey binding; running inert");
                        info!("Edit the [hotkey] binding in {:?} and restart", config_path);
                        return;
                    }
                };

                // Register the hotkey on the main thread — tao's event loop
                // pumps the Windows messages needed for WM_HOTKEY delivery.
                // hotkey_manager is stored in the closure's captured state so
                // it lives for the entire app lifetime.
                let (manager, hotkey_id) = match HotkeyHandler::register(hotkey) {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!(error = ?e, "Failed to register hotkey; running inert");
                        return;
                    }
                };
                hotkey_manager = Some(manager);
                registered = Some(hotkey);

                let (hotkey_id_tx, hotkey_id_rx) = watch::channel(hotkey_id);
                let (command_tx, command_rx) = mpsc::channel(32);
                let (shutdown_tx, shutdown_rx) = watch::channel(false);
                let proxy = proxy.clone();

                // Spawn tokio runtime on separate thread.
                // The hotkey manager stays on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        let endpoint = config.host.endpoint();

                        let (host, host_events, _io_handle) =
                            match HostClient::connect(&endpoint).await {
                                Ok(connection) => connection,
                                Err(e) => {
                                    error!(error = %e, "Cannot reach the host");
                                    info!(
                                        "{}",
                                        capabilities::host_remediation(&endpoint, &config_path)
                                    );
                                    let _ = proxy.send_event(ControlEvent::Shutdown);
                                    return;
                                }
                            };

                        match host.version().await {
                            Ok(version) => info!(
                                host = %version.obs_version,
                                protocol = %version.obs_web_socket_version,
                                "Connected to host"
                            ),
                            Err(e) => warn!(error = %e, "Host version probe failed"),
                        }

                        let hotkey_handler = HotkeyHandler::new(hotkey_id_rx, command_tx);

                        let app = App {
                            session: AbortSession::new(),
                            session_id: None,
                            host,
                            host_events,
                            command_rx,
                            shutdown_tx,
                            proxy: proxy.clone(),
                            hotkey_id_tx,
                            config,
                            config_path,
                        };

                        tokio::join!(
                            async {
                                if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                                    error!(error = ?e, "Hotkey handler error");
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                }
                            }
                        );

                        let _ = proxy.send_event(ControlEvent::Shutdown);
                    });
                });
            }
            _ => {}
        }

        // Keep hotkey_manager alive in the closure for the app's lifetime.
        let _ = &hotkey_manager;
    });
}
