//! Websocket client for the host control endpoint.
//!
//! [`HostClient::connect`] performs the Hello → Identify → Identified
//! handshake, then hands the socket to a background io task. Requests are
//! correlated to responses by id through oneshot channels; recording
//! lifecycle events are decoded and forwarded on an mpsc feed. Dropping the
//! feed's receiver or the client shuts the io task down.

use crate::{
    discovery::normalized_path,
    error::{HostError, Result as HostResult},
    host::{
        OutputAccess, OutputInfo,
        protocol::{self, Envelope, HostEvent, opcode},
    },
};

use std::{collections::HashMap, panic::Location, path::PathBuf, time::Duration};

use async_trait::async_trait;
use error_location::ErrorLocation;
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tokio::{
    net::TcpStream,
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// Deadline for a single request/response round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Status code the host uses for a missing resource.
const STATUS_RESOURCE_NOT_FOUND: u16 = 600;

/// Endpoint settings for [`HostClient::connect`].
#[derive(Debug, Clone)]
pub struct HostEndpoint {
    /// Host address, usually `localhost`.
    pub address: String,
    /// Websocket server port.
    pub port: u16,
    /// Password, required when the host has authentication enabled.
    pub password: Option<String>,
}

impl HostEndpoint {
    fn url(&self) -> String {
        format!("ws://{}:{}", self.address, self.port)
    }
}

/// Host and protocol versions, reported during the startup probe.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostVersion {
    /// Host application version.
    pub obs_version: String,
    /// Control protocol server version.
    pub obs_web_socket_version: String,
}

/// State of the host's record output.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStatus {
    /// Whether a recording is in progress.
    pub output_active: bool,
    /// Whether the recording is paused.
    #[serde(default)]
    pub output_paused: bool,
}

enum IoCommand {
    Request {
        envelope: Envelope,
        id: String,
        reply: oneshot::Sender<protocol::RequestResponse>,
    },
}

/// Handle to an identified host connection.
pub struct HostClient {
    io_tx: mpsc::Sender<IoCommand>,
}

impl HostClient {
    /// Connect to the host and identify with it.
    ///
    /// On success returns the client, the feed of recording lifecycle
    /// events, and the io task handle. The feed closing means the host
    /// connection is gone.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint is unreachable, the host requires
    /// a password that is not configured, or identification is rejected.
    #[instrument(skip(endpoint), fields(address = %endpoint.address, port = endpoint.port))]
    pub async fn connect(
        endpoint: &HostEndpoint,
    ) -> HostResult<(Self, mpsc::Receiver<HostEvent>, JoinHandle<()>)> {
        let url = endpoint.url();
        let (mut ws, _) = connect_async(url.as_str())
            .await
            .map_err(|e| HostError::ConnectFailed {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let hello: protocol::Hello = Self::expect(&mut ws, opcode::HELLO).await?;
        let authenticating = hello.authentication.is_some();
        debug!(
            rpc_version = hello.rpc_version,
            authenticating, "host greeting received"
        );

        let identify = protocol::identify(&hello, endpoint.password.as_deref())?;
        Self::send(&mut ws, &identify).await?;

        let identified: protocol::Identified = Self::expect(&mut ws, opcode::IDENTIFIED)
            .await
            .map_err(|e| match e {
                // The host drops the socket instead of answering when the
                // password does not match.
                HostError::Disconnected { location } if authenticating => {
                    HostError::IdentifyRejected {
                        reason: "connection closed during identification, check the password"
                            .to_string(),
                        location,
                    }
                }
                other => other,
            })?;

        info!(
            rpc_version = identified.negotiated_rpc_version,
            "identified with host"
        );

        let (event_tx, event_rx) = mpsc::channel(32);
        let (io_tx, io_rx) = mpsc::channel(32);
        let handle = tokio::spawn(io_task(ws, io_rx, event_tx));

        Ok((Self { io_tx }, event_rx, handle))
    }

    /// Issue a request and wait for the matching response payload.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection is gone, the deadline passes, or
    /// the host answers with a failure status.
    pub async fn request(&self, request_type: &str, data: Option<Value>) -> HostResult<Value> {
        let id = Uuid::new_v4().to_string();
        let envelope = protocol::request(&id, request_type, data);
        let (reply_tx, reply_rx) = oneshot::channel();

        self.io_tx
            .send(IoCommand::Request {
                envelope,
                id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| HostError::Disconnected {
                location: ErrorLocation::from(Location::caller()),
            })?;

        let response = tokio::time::timeout(REQUEST_TIMEOUT, reply_rx)
            .await
            .map_err(|_| HostError::RequestTimeout {
                request: request_type.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?
            .map_err(|_| HostError::Disconnected {
                location: ErrorLocation::from(Location::caller()),
            })?;

        if !response.request_status.result {
            return Err(HostError::RequestFailed {
                request: request_type.to_string(),
                code: response.request_status.code,
                comment: response.request_status.comment,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(response.response_data.unwrap_or(Value::Null))
    }

    /// Host and protocol versions. Doubles as the reachability probe.
    pub async fn version(&self) -> HostResult<HostVersion> {
        self.request_parsed("GetVersion").await
    }

    /// Current state of the host's record output.
    pub async fn record_status(&self) -> HostResult<RecordStatus> {
        self.request_parsed("GetRecordStatus").await
    }

    /// Command the host to stop the recording.
    ///
    /// Returns the final output file when the host names one.
    pub async fn stop_record(&self) -> HostResult<Option<PathBuf>> {
        let data = self.request("StopRecord", None).await?;

        Ok(data
            .get("outputPath")
            .and_then(Value::as_str)
            .map(normalized_path))
    }

    async fn request_parsed<T: DeserializeOwned>(&self, request_type: &str) -> HostResult<T> {
        let data = self.request(request_type, None).await?;
        serde_json::from_value(data).map_err(malformed)
    }

    async fn send(ws: &mut WsStream, envelope: &Envelope) -> HostResult<()> {
        let payload = serde_json::to_string(envelope).map_err(malformed)?;
        ws.send(Message::Text(payload.into())).await.map_err(transport)
    }

    /// Read frames until a payload with opcode `op` arrives.
    async fn expect<T: DeserializeOwned>(ws: &mut WsStream, op: u8) -> HostResult<T> {
        while let Some(msg) = ws.next().await {
            match msg.map_err(transport)? {
                Message::Text(text) => {
                    let envelope: Envelope = serde_json::from_str(&text).map_err(malformed)?;
                    if envelope.op == op {
                        return serde_json::from_value(envelope.d).map_err(malformed);
                    }
                    debug!(op = envelope.op, expected = op, "skipping handshake frame");
                }
                Message::Close(_) => break,
                _ => {}
            }
        }

        Err(HostError::Disconnected {
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

#[async_trait]
impl OutputAccess for HostClient {
    async fn list_outputs(&self) -> HostResult<Vec<OutputInfo>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct WireOutput {
            output_name: String,
            output_kind: String,
            #[serde(default)]
            output_active: bool,
        }

        #[derive(Deserialize)]
        struct OutputListData {
            #[serde(default)]
            outputs: Vec<WireOutput>,
        }

        let data = self.request("GetOutputList", None).await?;
        let list: OutputListData = serde_json::from_value(data).map_err(malformed)?;

        Ok(list
            .outputs
            .into_iter()
            .map(|o| OutputInfo {
                name: o.output_name,
                kind: o.output_kind,
                active: o.output_active,
            })
            .collect())
    }

    async fn output_settings(&self, name: &str) -> HostResult<Option<Value>> {
        let result = self
            .request("GetOutputSettings", Some(json!({ "outputName": name })))
            .await;

        match result {
            Ok(data) => Ok(data.get("outputSettings").cloned()),
            Err(HostError::RequestFailed {
                code: STATUS_RESOURCE_NOT_FOUND,
                ..
            }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[track_caller]
fn transport(e: tokio_tungstenite::tungstenite::Error) -> HostError {
    HostError::Transport {
        source: Box::new(e),
        location: ErrorLocation::from(Location::caller()),
    }
}

#[track_caller]
fn malformed(e: serde_json::Error) -> HostError {
    HostError::MalformedMessage {
        reason: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Owns the socket after the handshake.
///
/// Exits when the host closes the connection, the transport fails, or the
/// client handle is dropped. Dropping `events` on exit is what tells the
/// application the host is gone.
async fn io_task(
    ws: WsStream,
    mut commands: mpsc::Receiver<IoCommand>,
    events: mpsc::Sender<HostEvent>,
) {
    let (mut write, mut read) = ws.split();
    let mut pending: HashMap<String, oneshot::Sender<protocol::RequestResponse>> = HashMap::new();

    loop {
        tokio::select! {
            cmd = commands.recv() => match cmd {
                Some(IoCommand::Request { envelope, id, reply }) => {
                    let payload = match serde_json::to_string(&envelope) {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!(error = %e, "dropping unserializable request");
                            continue;
                        }
                    };
                    pending.insert(id, reply);
                    if let Err(e) = write.send(Message::Text(payload.into())).await {
                        error!(error = %e, "host connection lost while sending");
                        break;
                    }
                }
                None => break,
            },
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    dispatch_frame(&text, &mut pending, &events).await;
                }
                Some(Ok(Message::Ping(payload))) => {
                    if write.send(Message::Pong(payload)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!("host closed the connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!(error = %e, "host connection error");
                    break;
                }
            },
        }
    }

    let _ = close(&mut write).await;
}

async fn close(write: &mut WsSink) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    write.send(Message::Close(None)).await
}

async fn dispatch_frame(
    text: &str,
    pending: &mut HashMap<String, oneshot::Sender<protocol::RequestResponse>>,
    events: &mpsc::Sender<HostEvent>,
) {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "discarding malformed host frame");
            return;
        }
    };

    match envelope.op {
        opcode::EVENT => match serde_json::from_value::<protocol::EventMessage>(envelope.d) {
            Ok(event) => {
                if let Some(event) = protocol::decode_event(&event) {
                    // Receiver gone means shutdown is underway; the command
                    // channel closing ends this task right after.
                    let _ = events.send(event).await;
                }
            }
            Err(e) => warn!(error = %e, "discarding malformed host event"),
        },
        opcode::REQUEST_RESPONSE => {
            match serde_json::from_value::<protocol::RequestResponse>(envelope.d) {
                Ok(response) => match pending.remove(&response.request_id) {
                    Some(reply) => {
                        let _ = reply.send(response);
                    }
                    None => warn!(id = %response.request_id, "response for unknown request"),
                },
                Err(e) => warn!(error = %e, "discarding malformed host response"),
            }
        }
        _ => {}
    }
}
