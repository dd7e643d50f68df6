//! Producer ingress: NDJSON over TCP. Every complete line is counted against
//! the offset table and, when an engine link is up, forwarded to the engine.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_util::codec::FramedRead;

use crate::ingest::event::{record_line, Origin};
use crate::ingest::offsets::OffsetTable;
use crate::protocol::{FrameError, LineCodec};

/// Binds the producer port and runs the accept loop forever.
pub async fn start(
    addr: String,
    table: Arc<OffsetTable>,
    forward: Option<mpsc::Sender<String>>,
    max_line_len: usize,
) {
    let listener = TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind producer port {}: {}", addr, e));

    tracing::info!("[Producer] listening on tcp://{}", addr);
    run_listener(listener, table, forward, max_line_len).await;
}

/// Accept loop over an already-bound listener. Each connection is handled
/// independently; a framing error closes only that connection.
pub async fn run_listener(
    listener: TcpListener,
    table: Arc<OffsetTable>,
    forward: Option<mpsc::Sender<String>>,
    max_line_len: usize,
) {
    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("[Producer] accept failed: {}", e);
                continue;
            }
        };

        let table = table.clone();
        let forward = forward.clone();

        tracing::debug!("[Producer] new connection from {}", addr);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, &table, forward, max_line_len).await {
                tracing::warn!("[Producer] connection {} closed with error: {}", addr, e);
            } else {
                tracing::debug!("[Producer] connection {} closed", addr);
            }
        });
    }
}

async fn handle_connection(
    socket: TcpStream,
    table: &OffsetTable,
    forward: Option<mpsc::Sender<String>>,
    max_line_len: usize,
) -> Result<(), FrameError> {
    let mut framed = FramedRead::new(socket, LineCodec::new(max_line_len));

    while let Some(record) = framed.next().await {
        let record = record?;
        record_line(table, &record, Origin::Producer);

        // Best-effort relay into the engine. A full or closed link never
        // stalls ingestion; the record is simply not forwarded.
        if let Some(tx) = &forward {
            let _ = tx.try_send(record);
        }
    }

    Ok(())
}
