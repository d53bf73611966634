// ============================
// campus-backend-lib/src/ws_router.rs
// ============================
//! Real-time channel. Connections are tracked and logged; no messages are
//! exchanged at the application level.
use std::sync::Arc;
use std::time::Instant;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use dashmap::DashMap;
use metrics::{counter, gauge};
use tracing::{debug, info};
use uuid::Uuid;
use crate::metrics::{WS_ACTIVE, WS_CONNECTION, WS_DISCONNECTION};
use crate::storage::Storage;
use crate::AppState;

/// The set of open socket connections
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    open: DashMap<Uuid, Instant>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new connection and hand back its id
    pub fn register(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.open.insert(id, Instant::now());
        counter!(WS_CONNECTION).increment(1);
        gauge!(WS_ACTIVE).set(self.open.len() as f64);
        id
    }

    /// Forget a connection, returning its connected-at time if it was known
    pub fn unregister(&self, id: Uuid) -> Option<Instant> {
        let removed = self.open.remove(&id).map(|(_, since)| since);
        if removed.is_some() {
            counter!(WS_DISCONNECTION).increment(1);
            gauge!(WS_ACTIVE).set(self.open.len() as f64);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

/// Handler for `GET /ws`
pub async fn ws_handler<S: Storage + 'static>(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    let connections = state.connections.clone();
    ws.on_upgrade(move |socket| handle_connection(socket, connections))
}

async fn handle_connection(mut socket: WebSocket, connections: Arc<ConnectionRegistry>) {
    let id = connections.register();
    info!(connection = %id, active = connections.len(), "a user connected");

    while let Some(message) = socket.recv().await {
        match message {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}, // no application protocol; frames are ignored
            Err(err) => {
                debug!(connection = %id, error = %err, "socket error");
                break;
            },
        }
    }

    let duration = connections.unregister(id).map(|since| since.elapsed());
    info!(connection = %id, ?duration, "user disconnected");
}
