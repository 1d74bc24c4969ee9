//! WebSocket streaming of published advisories.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};

use crate::state::AppState;

/// Handler for WebSocket connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.orchestrator().subscribe();

    // Send the current advisory first so new clients need not wait for a change.
    rx.mark_changed();

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let advisory = rx.borrow_and_update().clone();
                let payload = match serde_json::to_string(advisory.as_ref()) {
                    Ok(payload) => payload,
                    Err(err) => {
                        tracing::error!("Failed to encode advisory #{}: {}", advisory.sequence, err);
                        continue;
                    }
                };
                if socket.send(Message::Text(payload)).await.is_err() {
                    break;
                }
            }
        }
    }
}
