// ============================
// website-backend-lib/src/presence.rs
// ============================
//! Realtime presence channel.
//!
//! Clients connect over a websocket; the server only records when they come
//! and go. Inbound frames are read and discarded.
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::StreamExt;
use metrics::{counter, gauge};
use uuid::Uuid;
use website_common::PresenceEvent;

use crate::metrics::{WS_ACTIVE, WS_CONNECTION, WS_DISCONNECTION};
use crate::AppState;

/// Destination for presence events
pub trait PresenceSink: Send + Sync {
    fn record(&self, event: PresenceEvent);
}

/// Logs presence events and keeps the websocket gauges current
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPresence;

impl PresenceSink for TracingPresence {
    fn record(&self, event: PresenceEvent) {
        match event {
            PresenceEvent::Connected(id) => {
                tracing::info!(connection_id = %id, "Client connected");
                counter!(WS_CONNECTION).increment(1);
                gauge!(WS_ACTIVE).increment(1.0);
            },
            PresenceEvent::Disconnected(id) => {
                tracing::info!(connection_id = %id, "Client disconnected {id}");
                counter!(WS_DISCONNECTION).increment(1);
                gauge!(WS_ACTIVE).decrement(1.0);
            },
        }
    }
}

/// Handler for WebSocket connections
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let presence = state.presence.clone();
    ws.on_upgrade(move |socket| handle_connection(socket, presence))
}

async fn handle_connection(mut socket: WebSocket, presence: Arc<dyn PresenceSink>) {
    let connection_id = Uuid::new_v4();
    presence.record(PresenceEvent::Connected(connection_id));

    while let Some(message) = socket.next().await {
        match message {
            Ok(Message::Close(_)) => break,
            Ok(_) => {},
            Err(e) => {
                tracing::debug!(%connection_id, "websocket error: {e}");
                break;
            },
        }
    }

    presence.record(PresenceEvent::Disconnected(connection_id));
}
