//! Wire format of the host's websocket control protocol (v5).
//!
//! Every message is an envelope `{"op": <opcode>, "d": <payload>}`. The
//! handshake is Hello → Identify → Identified, with an optional sha256
//! challenge-response when the host has authentication enabled. After the
//! handshake the socket carries request/response pairs correlated by id and
//! server-pushed events.

use crate::{
    discovery::normalized_path,
    error::{HostError, Result as HostResult},
};

use std::panic::Location;
use std::path::PathBuf;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

/// Protocol revision this client speaks.
pub const RPC_VERSION: u32 = 1;

/// Message opcodes.
pub mod opcode {
    /// Server greeting, first message after the socket opens.
    pub const HELLO: u8 = 0;
    /// Client identification, answers the greeting.
    pub const IDENTIFY: u8 = 1;
    /// Server acknowledgement of a successful identification.
    pub const IDENTIFIED: u8 = 2;
    /// Server-pushed event.
    pub const EVENT: u8 = 5;
    /// Client request.
    pub const REQUEST: u8 = 6;
    /// Server response to a request.
    pub const REQUEST_RESPONSE: u8 = 7;
}

/// Envelope around every protocol message.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    /// Message opcode.
    pub op: u8,
    /// Opcode-specific payload.
    pub d: Value,
}

/// Server greeting payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hello {
    /// Protocol revision the server offers.
    pub rpc_version: u32,
    /// Present when the server requires authentication.
    #[serde(default)]
    pub authentication: Option<AuthChallenge>,
}

/// Authentication challenge carried in the greeting.
#[derive(Debug, Deserialize)]
pub struct AuthChallenge {
    /// Server nonce for this connection.
    pub challenge: String,
    /// Server salt for the configured password.
    pub salt: String,
}

/// Server acknowledgement payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identified {
    /// Protocol revision both sides settled on.
    pub negotiated_rpc_version: u32,
}

/// Response to a request, matched to its id by the caller.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    /// Id of the request being answered.
    pub request_id: String,
    /// Outcome of the request.
    pub request_status: RequestStatus,
    /// Payload, present on successful requests that return data.
    #[serde(default)]
    pub response_data: Option<Value>,
}

/// Outcome of a request.
#[derive(Debug, Deserialize)]
pub struct RequestStatus {
    /// Whether the request succeeded.
    pub result: bool,
    /// Status code, `100` on success.
    pub code: u16,
    /// Human-readable failure detail.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Server-pushed event payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    /// Event name.
    pub event_type: String,
    /// Event-specific data.
    #[serde(default)]
    pub event_data: Value,
}

/// Compute the Identify authentication string for a greeting challenge.
///
/// `base64(sha256(base64(sha256(password + salt)) + challenge))`, per the
/// host protocol.
pub fn auth_response(password: &str, auth: &AuthChallenge) -> String {
    let secret = BASE64.encode(Sha256::digest(format!("{}{}", password, auth.salt)));
    BASE64.encode(Sha256::digest(format!("{}{}", secret, auth.challenge)))
}

/// Build the Identify message answering `hello`.
///
/// # Errors
///
/// Returns [`HostError::PasswordRequired`] when the server sent a challenge
/// and no password is configured.
#[track_caller]
pub fn identify(hello: &Hello, password: Option<&str>) -> HostResult<Envelope> {
    let mut d = json!({ "rpcVersion": RPC_VERSION });

    if let Some(auth) = &hello.authentication {
        let password = password.ok_or_else(|| HostError::PasswordRequired {
            location: ErrorLocation::from(Location::caller()),
        })?;
        d["authentication"] = json!(auth_response(password, auth));
    }

    Ok(Envelope {
        op: opcode::IDENTIFY,
        d,
    })
}

/// Build a request envelope.
pub fn request(id: &str, request_type: &str, data: Option<Value>) -> Envelope {
    let mut d = json!({
        "requestType": request_type,
        "requestId": id,
    });

    if let Some(data) = data {
        d["requestData"] = data;
    }

    Envelope {
        op: opcode::REQUEST,
        d,
    }
}

const EVENT_RECORD_STATE_CHANGED: &str = "RecordStateChanged";
const EVENT_RECORD_FILE_CHANGED: &str = "RecordFileChanged";

const OUTPUT_STARTED: &str = "OBS_WEBSOCKET_OUTPUT_STARTED";
const OUTPUT_STOPPED: &str = "OBS_WEBSOCKET_OUTPUT_STOPPED";

/// Recording lifecycle notifications pushed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A recording began.
    RecordingStarted,
    /// The active recording rolled over to a new file.
    RecordingFileChanged {
        /// File the recording is writing from now on.
        path: PathBuf,
    },
    /// The recording finished.
    RecordingStopped {
        /// Final file the host reported, when it named one.
        path: Option<PathBuf>,
    },
}

/// Decode an event message into a [`HostEvent`], if it is one we track.
///
/// Intermediate record states (starting, stopping, pausing) and unrelated
/// events yield `None`.
pub fn decode_event(event: &EventMessage) -> Option<HostEvent> {
    match event.event_type.as_str() {
        EVENT_RECORD_STATE_CHANGED => {
            let state = event.event_data.get("outputState")?.as_str()?;
            match state {
                OUTPUT_STARTED => Some(HostEvent::RecordingStarted),
                OUTPUT_STOPPED => Some(HostEvent::RecordingStopped {
                    path: event
                        .event_data
                        .get("outputPath")
                        .and_then(Value::as_str)
                        .map(normalized_path),
                }),
                _ => None,
            }
        }
        EVENT_RECORD_FILE_CHANGED => {
            let path = event.event_data.get("newOutputPath")?.as_str()?;
            Some(HostEvent::RecordingFileChanged {
                path: normalized_path(path),
            })
        }
        _ => None,
    }
}
