//! Host application integration.
//!
//! The host is reached over its websocket control protocol. [`protocol`]
//! defines the wire format, [`client`] drives the socket, and
//! [`OutputAccess`] is the seam the discovery code consumes so it can be
//! exercised against a fake host in tests.

mod client;
pub(crate) mod protocol;

pub use client::{HostClient, HostEndpoint, HostVersion, RecordStatus};
pub use protocol::HostEvent;

use crate::error::Result as HostResult;

use async_trait::async_trait;
use serde_json::Value;

/// Description of one host output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputInfo {
    /// Output name, unique within the host.
    pub name: String,
    /// Output kind identifier, e.g. the recording muxer.
    pub kind: String,
    /// Whether the output is currently running.
    pub active: bool,
}

/// Read access to the host's outputs.
#[async_trait]
pub trait OutputAccess: Send + Sync {
    /// Enumerate every output the host knows about.
    async fn list_outputs(&self) -> HostResult<Vec<OutputInfo>>;

    /// Settings object of the named output, or `None` when no such output
    /// exists.
    async fn output_settings(&self, name: &str) -> HostResult<Option<Value>>;
}
