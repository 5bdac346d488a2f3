//! WebSocket upgrade handler for the live question feed.
//!
//! The feed is broadcast-only: inbound text frames are ignored. Each
//! connection registers with the shared [`WebSocketManager`], drains its
//! outbound queue from a writer task, and unregisters once either side of
//! the socket closes.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use util::state::AppState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

/// `GET /ws/questions`
///
/// Upgrades the connection and subscribes it to the question feed.
pub async fn question_feed_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_feed_socket(socket, app_state))
}

async fn handle_feed_socket(socket: WebSocket, app_state: AppState) {
    let manager = app_state.ws_clone();
    let (id, mut rx) = manager.register().await;
    tracing::info!(connection_id = id, "question feed client connected");

    let (mut sender, mut receiver) = socket.split();

    // Drain the outbound queue in order; keep-alive pings ride the same task
    // so frames never interleave mid-write.
    let mut write_task = tokio::spawn(async move {
        let mut ping = tokio::time::interval(PING_INTERVAL);
        ping.tick().await; // first tick fires immediately
        loop {
            tokio::select! {
                frame = rx.recv() => match frame {
                    Some(frame) => {
                        if sender.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
                _ = ping.tick() => {
                    if sender.send(Message::Ping(Vec::new().into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Inbound frames carry no meaning on this feed; the read side exists to
    // notice the close handshake. Pings are answered by axum itself.
    let mut read_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            if let Message::Close(_) = message {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut write_task => read_task.abort(),
        _ = &mut read_task => write_task.abort(),
    }

    manager.unregister(id).await;
    tracing::info!(connection_id = id, "question feed client disconnected");
}
