#[allow(clippy::module_inception)]
mod config;
mod host_config;
mod hotkey_config;

pub(crate) use {config::Config, host_config::HostConfig, hotkey_config::HotkeyConfig};

pub(crate) const DEFAULT_HOST_ADDRESS: &str = "localhost";
pub(crate) const DEFAULT_HOST_PORT: u16 = 4455;
pub(crate) const DEFAULT_HOTKEY_BINDING: &str = "CTRL+SHIFT+Backspace";

pub(crate) fn default_host_address() -> String {
    DEFAULT_HOST_ADDRESS.to_string()
}

pub(crate) fn default_host_port() -> u16 {
    DEFAULT_HOST_PORT
}

pub(crate) fn default_hotkey_binding() -> String {
    DEFAULT_HOTKEY_BINDING.to_string()
}
