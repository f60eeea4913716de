/// Commands sent from the hotkey handler to the main application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Stop the active recording and send its files to the trash.
    AbortRecording,
}
