//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, DrawingSegment, ImageDescriptor},
    infrastructure::dto::{
        conversion::{image_id_from_wire, timer_settings_from_wire},
        websocket::ClientMessage,
    },
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: events relayed to this connection
/// (via rx channel) are written to its WebSocket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive events
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.connect_client_usecase.execute(tx).await;
    tracing::info!("Connection '{}' opened", connection_id);

    let state_clone = state.clone();

    // Spawn a task to receive commands from this connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(command) => dispatch(&state_clone, connection_id, command).await,
                    Err(e) => {
                        tracing::warn!(
                            "Dropping undecodable frame from '{}': {}",
                            connection_id,
                            e
                        );
                    }
                },
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push relayed events to this connection
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let left = state
        .disconnect_client_usecase
        .execute(&connection_id)
        .await;
    match left {
        Some(room_id) => tracing::info!(
            "Connection '{}' closed, left room '{}'",
            connection_id,
            room_id
        ),
        None => tracing::info!("Connection '{}' closed", connection_id),
    }
}

/// Route one decoded command to its use case.
async fn dispatch(state: &AppState, connection_id: ConnectionId, command: ClientMessage) {
    tracing::debug!("Command from '{}': {:?}", connection_id, command);

    if let ClientMessage::Join { room_id } = command {
        state
            .join_room_usecase
            .execute(connection_id, room_id)
            .await;
        return;
    }

    let room_id = state
        .join_room_usecase
        .resolve(&connection_id, command.room_id().map(str::to_string))
        .await;

    match command {
        ClientMessage::Join { .. } => {}
        ClientMessage::RequestRoomState { .. } => {
            state
                .sync_room_usecase
                .execute(&room_id, &connection_id)
                .await;
        }
        ClientMessage::Drawing {
            client_id,
            line,
            color,
            width,
            ..
        } => {
            let segment = DrawingSegment {
                client_id,
                line: line.into(),
                color,
                width,
            };
            state
                .edit_document_usecase
                .append_drawing(&room_id, &connection_id, segment)
                .await;
        }
        ClientMessage::ImageAdded { image, .. } => {
            state
                .edit_document_usecase
                .add_image(&room_id, &connection_id, ImageDescriptor::from(image))
                .await;
        }
        ClientMessage::ImageUpdated { image, .. } => {
            state
                .edit_document_usecase
                .update_image(&room_id, &connection_id, ImageDescriptor::from(image))
                .await;
        }
        ClientMessage::ImageDeleted { image_id, .. } => {
            let image_id = image_id_from_wire(image_id.as_ref());
            state
                .edit_document_usecase
                .delete_image(&room_id, &connection_id, image_id)
                .await;
        }
        ClientMessage::Clear { client_id, .. } => {
            state
                .edit_document_usecase
                .clear(&room_id, &connection_id, client_id)
                .await;
        }
        ClientMessage::TimerStart { .. } => {
            state.timer_engine_usecase.start(&room_id).await;
        }
        ClientMessage::TimerPause { .. } => {
            state.timer_engine_usecase.pause(&room_id).await;
        }
        ClientMessage::TimerReset { .. } => {
            state.timer_engine_usecase.reset(&room_id).await;
        }
        ClientMessage::TimerSkip { .. } => {
            state.timer_engine_usecase.skip(&room_id).await;
        }
        ClientMessage::TimerSettingsUpdate {
            focus_minutes,
            break_minutes,
            ..
        } => {
            state
                .timer_engine_usecase
                .update_settings(
                    &room_id,
                    timer_settings_from_wire(focus_minutes, break_minutes),
                )
                .await;
        }
        ClientMessage::TimerRequestSync { .. } => {
            state
                .timer_engine_usecase
                .request_sync(&room_id, &connection_id)
                .await;
        }
    }
}
