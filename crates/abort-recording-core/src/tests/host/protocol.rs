use crate::host::protocol::{
    self, Envelope, EventMessage, Hello, HostEvent, RPC_VERSION, opcode,
};
use crate::{HostError, normalized_path};

use serde_json::json;

/// WHAT: A greeting with an auth challenge parses into Hello
/// WHY: The handshake starts from this message
#[test]
#[allow(clippy::unwrap_used)]
fn given_greeting_with_challenge_when_parsing_then_auth_fields_present() {
    // Given: A greeting frame as the host sends it
    let raw = json!({
        "op": 0,
        "d": {
            "obsWebSocketVersion": "5.5.2",
            "rpcVersion": 1,
            "authentication": {
                "challenge": "ZVjHSiz0AuD2KXQe2B1qmU5V/rDV9gxkOtB5UiLpS3o=",
                "salt": "sU5pl1UBg4GLJFRRCCYB5BnKTCUE4uPGaHDI1BApVBQ="
            }
        }
    });

    // When: Parsing envelope and payload
    let envelope: Envelope = serde_json::from_value(raw).unwrap();
    assert_eq!(envelope.op, opcode::HELLO);
    let hello: Hello = serde_json::from_value(envelope.d).unwrap();

    // Then: The challenge is available for the auth computation
    assert_eq!(hello.rpc_version, RPC_VERSION);
    let auth = hello.authentication.unwrap();
    assert!(!auth.challenge.is_empty());
    assert!(!auth.salt.is_empty());
}

/// WHAT: A greeting without authentication parses with no challenge
/// WHY: Hosts with auth disabled must identify without a password
#[test]
#[allow(clippy::unwrap_used)]
fn given_open_greeting_when_parsing_then_no_challenge() {
    // Given: A greeting without an authentication block
    let hello: Hello =
        serde_json::from_value(json!({ "obsWebSocketVersion": "5.5.2", "rpcVersion": 1 }))
            .unwrap();

    // Then: No challenge is present
    assert!(hello.authentication.is_none());
}

/// WHAT: The auth response is deterministic and password-sensitive
/// WHY: Identification must be reproducible and reject wrong passwords
#[test]
#[allow(clippy::unwrap_used)]
fn given_challenge_when_computing_auth_then_deterministic_and_password_sensitive() {
    // Given: A fixed challenge and salt
    let auth = serde_json::from_value::<Hello>(json!({
        "rpcVersion": 1,
        "authentication": { "challenge": "challenge", "salt": "salt" }
    }))
    .unwrap()
    .authentication
    .unwrap();

    // When: Computing the response twice, plus once with another password
    let first = protocol::auth_response("hunter2", &auth);
    let second = protocol::auth_response("hunter2", &auth);
    let other = protocol::auth_response("hunter3", &auth);

    // Then: Same inputs agree, different passwords differ, output is a
    // base64 sha256 digest (44 characters)
    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(first.len(), 44);
}

/// WHAT: Identify answers a challenge when a password is configured
/// WHY: The host rejects identification without the auth string
#[test]
#[allow(clippy::unwrap_used)]
fn given_challenge_and_password_when_identifying_then_auth_string_included() {
    // Given: A greeting with a challenge
    let hello: Hello = serde_json::from_value(json!({
        "rpcVersion": 1,
        "authentication": { "challenge": "challenge", "salt": "salt" }
    }))
    .unwrap();

    // When: Building the Identify message
    let identify = protocol::identify(&hello, Some("hunter2")).unwrap();

    // Then: Opcode, rpc version, and auth string are all present
    assert_eq!(identify.op, opcode::IDENTIFY);
    assert_eq!(identify.d["rpcVersion"], json!(RPC_VERSION));
    assert!(identify.d["authentication"].is_string());
}

/// WHAT: Identify without a configured password fails on a challenge
/// WHY: The capability gate surfaces the missing password instead of a
/// silent rejection
#[test]
#[allow(clippy::unwrap_used)]
fn given_challenge_without_password_when_identifying_then_password_required() {
    // Given: A greeting with a challenge and no configured password
    let hello: Hello = serde_json::from_value(json!({
        "rpcVersion": 1,
        "authentication": { "challenge": "challenge", "salt": "salt" }
    }))
    .unwrap();

    // When: Building the Identify message
    let result = protocol::identify(&hello, None);

    // Then: The missing password is reported
    assert!(matches!(result, Err(HostError::PasswordRequired { .. })));
}

/// WHAT: Identify omits the auth field when the host has no challenge
/// WHY: Sending auth to an open host is a protocol violation
#[test]
#[allow(clippy::unwrap_used)]
fn given_open_greeting_when_identifying_then_no_auth_field() {
    // Given: A greeting without a challenge
    let hello: Hello = serde_json::from_value(json!({ "rpcVersion": 1 })).unwrap();

    // When: Building the Identify message
    let identify = protocol::identify(&hello, Some("unused")).unwrap();

    // Then: No authentication field is present
    assert!(identify.d.get("authentication").is_none());
}

/// WHAT: Request envelopes carry type, id, and optional data
/// WHY: Responses are correlated by the id sent here
#[test]
fn given_request_when_building_then_envelope_fields_set() {
    // Given/When: A request with and one without data
    let bare = protocol::request("id-1", "StopRecord", None);
    let with_data = protocol::request(
        "id-2",
        "GetOutputSettings",
        Some(json!({ "outputName": "adv_file_output" })),
    );

    // Then: Fields land where the protocol expects them
    assert_eq!(bare.op, opcode::REQUEST);
    assert_eq!(bare.d["requestType"], json!("StopRecord"));
    assert_eq!(bare.d["requestId"], json!("id-1"));
    assert!(bare.d.get("requestData").is_none());
    assert_eq!(
        with_data.d["requestData"]["outputName"],
        json!("adv_file_output")
    );
}

/// WHAT: A record-started state change decodes to RecordingStarted
/// WHY: This event arms the abort session
#[test]
#[allow(clippy::unwrap_used)]
fn given_record_started_event_when_decoding_then_recording_started() {
    // Given: The state-change event the host emits at start
    let event: EventMessage = serde_json::from_value(json!({
        "eventType": "RecordStateChanged",
        "eventData": {
            "outputActive": true,
            "outputState": "OBS_WEBSOCKET_OUTPUT_STARTED",
            "outputPath": null
        }
    }))
    .unwrap();

    // When/Then: It decodes to the started notification
    assert_eq!(
        protocol::decode_event(&event),
        Some(HostEvent::RecordingStarted)
    );
}

/// WHAT: A record-stopped state change carries the final output path
/// WHY: The stop event is the last chance to learn the recording's file
#[test]
#[allow(clippy::unwrap_used)]
fn given_record_stopped_event_when_decoding_then_final_path_carried() {
    // Given: The state-change event the host emits at stop
    let event: EventMessage = serde_json::from_value(json!({
        "eventType": "RecordStateChanged",
        "eventData": {
            "outputActive": false,
            "outputState": "OBS_WEBSOCKET_OUTPUT_STOPPED",
            "outputPath": "/rec/video.mp4"
        }
    }))
    .unwrap();

    // When/Then: It decodes with the normalized final path
    assert_eq!(
        protocol::decode_event(&event),
        Some(HostEvent::RecordingStopped {
            path: Some(normalized_path("/rec/video.mp4")),
        })
    );
}

/// WHAT: Intermediate record states decode to nothing
/// WHY: Only started and stopped drive session transitions
#[test]
#[allow(clippy::unwrap_used)]
fn given_intermediate_state_when_decoding_then_ignored() {
    // Given: The stopping transition the host emits before stop
    let event: EventMessage = serde_json::from_value(json!({
        "eventType": "RecordStateChanged",
        "eventData": {
            "outputActive": false,
            "outputState": "OBS_WEBSOCKET_OUTPUT_STOPPING",
            "outputPath": "/rec/video.mp4"
        }
    }))
    .unwrap();

    // When/Then: It is ignored
    assert_eq!(protocol::decode_event(&event), None);
}

/// WHAT: A file-change event decodes with the new destination
/// WHY: Split recordings report each rotated file through this event
#[test]
#[allow(clippy::unwrap_used)]
fn given_file_changed_event_when_decoding_then_new_path_carried() {
    // Given: The rotation event the host emits mid-recording
    let event: EventMessage = serde_json::from_value(json!({
        "eventType": "RecordFileChanged",
        "eventData": { "newOutputPath": "/rec/video_0002.mp4" }
    }))
    .unwrap();

    // When/Then: It decodes with the rotated file
    assert_eq!(
        protocol::decode_event(&event),
        Some(HostEvent::RecordingFileChanged {
            path: normalized_path("/rec/video_0002.mp4"),
        })
    );
}

/// WHAT: Unrelated events decode to nothing
/// WHY: The subscription carries far more than recording lifecycle
#[test]
#[allow(clippy::unwrap_used)]
fn given_unrelated_event_when_decoding_then_ignored() {
    // Given: A scene switch event
    let event: EventMessage = serde_json::from_value(json!({
        "eventType": "CurrentProgramSceneChanged",
        "eventData": { "sceneName": "Gameplay" }
    }))
    .unwrap();

    // When/Then: It is ignored
    assert_eq!(protocol::decode_event(&event), None);
}
