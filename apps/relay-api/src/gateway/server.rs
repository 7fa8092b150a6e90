//! WebSocket upgrade handler and per-connection lifecycle.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::AppState;

use super::registry::ConnectionHandle;

/// Frames queued per connection before pushes start waiting on the peer.
const OUTBOUND_BUFFER: usize = 64;

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(ws_upgrade))
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

/// Drive one connection from registration to teardown.
///
/// The socket is split: a dedicated writer task drains the outbound channel
/// into the sink, while this task owns the read loop. Either side failing
/// ends the connection, and the cleanup below runs exactly once. The
/// registry removal is idempotent, so it doesn't matter whether the read
/// loop or a failed broadcast push detected the peer's death first.
async fn handle_connection(socket: WebSocket, state: AppState) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (tx, mut rx) = mpsc::channel::<Message>(OUTBOUND_BUFFER);
    let conn_id = relay_common::id::prefixed_ulid(relay_common::id::prefix::CONNECTION);

    if let Err(err) = state.registry.add(ConnectionHandle::new(conn_id.clone(), tx)) {
        tracing::error!(conn_id = %conn_id, %err, "refusing connection");
        return;
    }

    tracing::info!(
        conn_id = %conn_id,
        total = state.registry.len(),
        "connection registered"
    );

    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_tx.send(msg).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(Message::Text(text)) => state.hub.ingest(text, &conn_id).await,
            Ok(Message::Close(_)) => break,
            // Pings are answered by axum itself; binary frames are not part
            // of the protocol.
            Ok(_) => continue,
            Err(err) => {
                tracing::debug!(conn_id = %conn_id, %err, "ws read error");
                break;
            }
        }
    }

    // Single teardown path. The hub may already have pruned this connection
    // after a failed push; remove() is a no-op in that case.
    state.registry.remove(&conn_id);
    writer.abort();

    tracing::info!(
        conn_id = %conn_id,
        total = state.registry.len(),
        "connection closed"
    );
}
