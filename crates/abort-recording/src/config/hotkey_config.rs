use crate::{AppError, AppResult, config::default_hotkey_binding};

use std::panic::Location;

use error_location::ErrorLocation;
use global_hotkey::hotkey::HotKey;
use serde::{Deserialize, Serialize};

/// Abort hotkey configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Key combination that aborts the recording, e.g. `CTRL+SHIFT+Backspace`.
    #[serde(default = "default_hotkey_binding")]
    pub binding: String,
}

impl HotkeyConfig {
    /// Parse the configured binding.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when the binding string is not a valid key
    /// combination.
    #[track_caller]
    pub fn hotkey(&self) -> AppResult<HotKey> {
        self.binding
            .parse::<HotKey>()
            .map_err(|e| AppError::ConfigError {
                reason: format!("invalid hotkey binding {:?}: {}", self.binding, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            binding: default_hotkey_binding(),
        }
    }
}
