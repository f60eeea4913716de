//! Startup capability checks.
//!
//! A missing capability leaves the app loaded but inert: the hotkey is never
//! registered and the log carries remediation text instead. Host
//! reachability is checked later, once the async runtime is up.

use abort_recording_core::HostEndpoint;

/// One-line summary logged at startup.
pub(crate) const ABOUT: &str =
    "Abort Recording: press the abort hotkey to stop the current recording \
     and send its files to the system trash";

/// Check that the OS trash can be resolved from this process.
///
/// # Errors
///
/// Returns remediation text when the trash location cannot be determined.
#[cfg(all(unix, not(target_os = "macos")))]
pub(crate) fn trash_available() -> Result<(), String> {
    // The freedesktop trash lives under the user's data directory; without a
    // home directory there is nowhere to move files.
    match directories::BaseDirs::new() {
        Some(_) => Ok(()),
        None => Err(
            "no home directory found; set HOME so the freedesktop trash \
             directory can be resolved"
                .to_string(),
        ),
    }
}

/// Check that the OS trash can be resolved from this process.
///
/// # Errors
///
/// Never fails on this platform; the recycle bin / trash is always present.
#[cfg(any(windows, target_os = "macos"))]
pub(crate) fn trash_available() -> Result<(), String> {
    Ok(())
}

/// Remediation text for an unreachable host.
pub(crate) fn host_remediation(endpoint: &HostEndpoint, config_path: &std::path::Path) -> String {
    format!(
        "The host at {}:{} did not answer. Start OBS Studio, enable the \
         websocket server under Tools > WebSocket Server Settings, and match \
         its port and password in {}",
        endpoint.address,
        endpoint.port,
        config_path.display()
    )
}
