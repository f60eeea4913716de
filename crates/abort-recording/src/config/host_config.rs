use crate::config::{default_host_address, default_host_port};

use abort_recording_core::HostEndpoint;

use serde::{Deserialize, Serialize};

/// Connection settings for the host's websocket control server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Host address.
    #[serde(default = "default_host_address")]
    pub address: String,
    /// Websocket server port.
    #[serde(default = "default_host_port")]
    pub port: u16,
    /// Websocket password, required when the host has authentication enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl HostConfig {
    /// Endpoint to hand to the host client.
    pub fn endpoint(&self) -> HostEndpoint {
        HostEndpoint {
            address: self.address.clone(),
            port: self.port,
            password: self.password.clone(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            address: default_host_address(),
            port: default_host_port(),
            password: None,
        }
    }
}
