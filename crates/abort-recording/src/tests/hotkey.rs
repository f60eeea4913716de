use crate::{AppCommand, AppError, HotkeyHandler};

use tokio::sync::{mpsc, watch};

/// WHAT: A press is forwarded as an abort command
/// WHY: The hotkey is the only trigger for the whole abort flow
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_open_channel_when_pressed_then_abort_command_received() {
    // Given: A handler wired to an open command channel
    let (_id_tx, id_rx) = watch::channel(1u32);
    let (command_tx, mut command_rx) = mpsc::channel(32);
    let handler = HotkeyHandler::new(id_rx, command_tx);

    // When: The hotkey is pressed
    handler.on_pressed().await.unwrap();

    // Then: The application receives the abort command
    let cmd = command_rx.recv().await.unwrap();
    assert_eq!(cmd, AppCommand::AbortRecording);
}

/// WHAT: A press against a closed channel surfaces an error
/// WHY: A dead application must not swallow presses silently
#[tokio::test]
async fn given_closed_channel_when_pressed_then_channel_send_failed() {
    // Given: A handler whose command channel receiver is gone
    let (_id_tx, id_rx) = watch::channel(1u32);
    let (command_tx, command_rx) = mpsc::channel(1);
    drop(command_rx);
    let handler = HotkeyHandler::new(id_rx, command_tx);

    // When: The hotkey is pressed
    let result = handler.on_pressed().await;

    // Then: The send failure is reported
    assert!(matches!(result, Err(AppError::ChannelSendFailed { .. })));
}

/// WHAT: A rebind updates the id the handler filters on
/// WHY: After a config change, only the new binding may trigger aborts
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_rebound_hotkey_when_id_sent_then_handler_sees_new_id() {
    // Given: A handler filtering on the initial hotkey id
    let (id_tx, id_rx) = watch::channel(1u32);
    let (command_tx, _command_rx) = mpsc::channel(32);
    let handler = HotkeyHandler::new(id_rx.clone(), command_tx);
    drop(handler);

    // When: The application publishes a new id after a rebind
    id_tx.send(2u32).unwrap();

    // Then: The watched id has moved on
    assert_eq!(*id_rx.borrow(), 2u32);
}
