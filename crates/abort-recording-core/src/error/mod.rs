use error_location::ErrorLocation;
use thiserror::Error;

/// Host communication errors with source location tracking.
#[derive(Error, Debug)]
pub enum HostError {
    /// Connecting to the host's websocket endpoint failed.
    #[error("Cannot reach host: {reason} {location}")]
    ConnectFailed {
        /// Description of the connection failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The host closed or dropped the connection.
    #[error("Host connection lost {location}")]
    Disconnected {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The host requires authentication but no password is configured.
    #[error("Host requires a password and none is configured {location}")]
    PasswordRequired {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The host rejected our identification, usually a bad password.
    #[error("Host rejected identification: {reason} {location}")]
    IdentifyRejected {
        /// Description of the rejection.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The host answered a request with a failure status.
    #[error("Request {request} failed with status {code}: {comment:?} {location}")]
    RequestFailed {
        /// Request type that failed.
        request: String,
        /// Status code reported by the host.
        code: u16,
        /// Optional human-readable comment from the host.
        comment: Option<String>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A request was not answered within the deadline.
    #[error("Request {request} timed out {location}")]
    RequestTimeout {
        /// Request type that timed out.
        request: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The host sent a frame we could not decode.
    #[error("Malformed host message: {reason} {location}")]
    MalformedMessage {
        /// Description of the decode failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Transport-level websocket failure.
    #[error("Transport error: {source} {location}")]
    Transport {
        /// Underlying websocket error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`HostError`].
pub type Result<T> = std::result::Result<T, HostError>;
