//! WebSocket transport: one task pair per viewer connection.
//!
//! Inbound frames are parsed into [`ClientEvent`]s at this boundary; anything
//! that does not parse is logged and dropped before it can reach the hub.
//! Outbound events arrive on a per-connection unbounded channel, which keeps
//! per-connection delivery order intact.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use spk_schemas::{ClientEvent, ServerEvent};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::AppState;

pub(crate) async fn ws_handler(
    State(st): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(st, socket))
}

async fn handle_socket(st: Arc<AppState>, socket: WebSocket) {
    let conn_id = Uuid::new_v4();
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Channel for server → client events; the hub pushes, this task drains.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    st.hub.write().await.register(conn_id, tx);
    info!(%conn_id, "viewer connected");

    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Ok(text) = serde_json::to_string(&event) else {
                continue;
            };
            if ws_tx.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_rx.next().await {
        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => st.hub.write().await.handle_client_event(conn_id, event),
                Err(err) => {
                    warn!(%conn_id, %err, "dropping malformed client frame");
                }
            },
            Message::Close(_) => break,
            // Binary frames are not part of the protocol; pings are answered
            // by axum automatically.
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    st.hub.write().await.unregister(conn_id);
    writer.abort();
    info!(%conn_id, "viewer disconnected");
}
