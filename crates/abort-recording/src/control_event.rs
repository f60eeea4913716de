use global_hotkey::hotkey::HotKey;

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns the `GlobalHotKeyManager` (registration needs its
/// message pump), so hotkey swaps and process lifecycle events flow through
/// this enum.
#[derive(Debug, Clone, Copy)]
pub enum ControlEvent {
    /// Replace the registered hotkey with a new binding.
    Rebind(HotKey),
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}
