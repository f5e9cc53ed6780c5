//! GET /ws - server push channel
//!
//! The client gets a `connected` greeting, then every hub event as a JSON
//! text frame. Client frames are read and dropped until it disconnects.

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

use crate::core::ServerState;
use crate::services::EventHub;

pub fn router() -> Router<ServerState> {
    Router::new().route("/ws", get(handle_ws))
}

#[derive(Serialize)]
struct Welcome {
    #[serde(rename = "type")]
    kind: &'static str,
    message: &'static str,
}

const WELCOME: Welcome = Welcome {
    kind: "connected",
    message: "Connected to ESC/POS Printer Service",
};

async fn handle_ws(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state.hub))
}

async fn handle_connection(socket: WebSocket, hub: EventHub) {
    // Subscribe before the greeting so nothing published in between is lost
    let mut events = hub.subscribe();
    let (mut ws_sink, mut ws_stream) = socket.split();

    tracing::info!(clients = hub.subscriber_count(), "WebSocket client connected");

    if let Ok(json) = serde_json::to_string(&WELCOME)
        && ws_sink.send(Message::Text(json.into())).await.is_err()
    {
        tracing::warn!("Failed to send welcome, disconnecting");
        return;
    }

    loop {
        tokio::select! {
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error: {e}");
                        break;
                    }
                    // Text, Binary, Ping, Pong: ignore
                    Some(Ok(_)) => {}
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let Ok(json) = serde_json::to_string(&event) else {
                            continue;
                        };
                        if ws_sink.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "WebSocket client lagging, events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::info!("WebSocket client disconnected");
}
