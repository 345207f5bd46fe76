//! Notification websocket endpoint.
//!
//! A client subscribes to `<subsystem>/<owner_id>` and receives an opaque
//! "changed" text frame whenever the engine publishes on that topic. Clients
//! re-fetch over HTTP; the frame carries no data.

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::StreamExt;
use tokio::sync::broadcast;

use crate::server::ServerState;
use engine::Subsystem;

pub async fn subscribe(
    ws: WebSocketUpgrade,
    Path((subsystem, owner_id)): Path<(String, String)>,
    State(state): State<ServerState>,
) -> Result<impl IntoResponse, StatusCode> {
    let subsystem = Subsystem::try_from(subsystem.as_str()).map_err(|_| StatusCode::NOT_FOUND)?;
    let receiver = state.engine.notifier().subscribe(subsystem, &owner_id);
    Ok(ws.on_upgrade(move |socket| forward(socket, receiver)))
}

async fn forward(mut socket: WebSocket, mut receiver: broadcast::Receiver<String>) {
    loop {
        tokio::select! {
            signal = receiver.recv() => match signal {
                Ok(signal) => {
                    if socket.send(Message::Text(signal.into())).await.is_err() {
                        break;
                    }
                }
                // Missed signals collapse into one: the client re-fetches
                // anyway, so a single frame carries the same information.
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    if socket.send(Message::Text("changed".into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Inbound frames are ignored; the channel is one-way.
                Some(Ok(_)) => {}
            },
        }
    }
}
