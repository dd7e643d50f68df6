//! Dashboard session: lifecycle of one WebSocket connection.
//! Greeting first, then tick-driven pushes; inbound `SET_GROUP` adjusts the
//! session, anything malformed is silently ignored.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::engine::client::EngineClient;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::snapshot::builder::{polled_snapshot, SnapshotSource, TickTotals};
use crate::PulseGateway;

pub async fn run_session(socket: WebSocket, gateway: PulseGateway) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Greeting goes into the channel before the session is visible to any
    // tick, so it is always the first record the client sees.
    let default_group = gateway.hub.default_group().to_string();
    let _ = tx.send(ServerMessage::Hello {
        groups: vec![default_group.clone()],
        default_group,
    });

    let guard = gateway.hub.register(tx.clone());
    let session_tag = guard.id().short().to_string();
    tracing::debug!("[Session:{}] connected", session_tag);

    // Forward task: outbound channel -> socket. A send failure just means
    // the client went away; the inbound loop notices separately.
    let forward_tag = session_tag.clone();
    let forward = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            match serde_json::to_string(&message) {
                Ok(json) => {
                    if ws_tx.send(Message::Text(json.into())).await.is_err() {
                        tracing::debug!("[Session:{}] send failed, closing", forward_tag);
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("[Session:{}] failed to serialize message: {}", forward_tag, e);
                }
            }
        }
    });

    // Polling mode: this session drives its own snapshot timer, torn down
    // with the connection. Direct mode is driven by the global ticker.
    let tick_task = match &*gateway.source {
        SnapshotSource::Polling(client) => Some(tokio::spawn(poll_loop(
            client.clone(),
            gateway.tick,
            guard.group_handle(),
            tx,
            session_tag.clone(),
        ))),
        SnapshotSource::Direct(_) => None,
    };

    while let Some(inbound) = ws_rx.next().await {
        match inbound {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::SetGroup { group }) if !group.is_empty() => {
                    tracing::debug!("[Session:{}] group set to '{}'", session_tag, group);
                    guard.set_group(group);
                }
                // Empty group, unknown type, or no JSON at all: ignored.
                Ok(_) | Err(_) => {}
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {} // ping/pong handled by axum, binary unsupported
            Err(e) => {
                tracing::debug!("[Session:{}] socket error: {}", session_tag, e);
                break;
            }
        }
    }

    if let Some(task) = tick_task {
        task.abort();
    }
    forward.abort();

    tracing::debug!("[Session:{}] disconnected", session_tag);
    drop(guard);
}

/// One polling session's snapshot timer. Each tick issues the two engine
/// queries for the group selected at that moment; a failed tick surfaces an
/// `ERROR` and keeps the previous totals for the next delta.
async fn poll_loop(
    client: EngineClient,
    tick: Duration,
    group: Arc<Mutex<String>>,
    tx: mpsc::UnboundedSender<ServerMessage>,
    session_tag: String,
) {
    let mut interval = tokio::time::interval(tick);
    interval.tick().await; // skip the immediate first tick

    let mut last: Option<TickTotals> = None;

    loop {
        interval.tick().await;
        let group_now = group.lock().clone();

        let message = match polled_snapshot(&client, &group_now, last.as_ref()).await {
            Ok((snapshot, totals)) => {
                last = Some(totals);
                ServerMessage::Snapshot(snapshot)
            }
            Err(e) => {
                tracing::debug!("[Session:{}] tick failed: {}", session_tag, e);
                ServerMessage::Error { message: e.to_string() }
            }
        };

        if tx.send(message).is_err() {
            break; // session gone, the in-flight result is discarded
        }
    }
}
