//! Engine link (direct mode): a persistent outbound connection to the engine.
//! Lines the engine emits are counted like producer events; producer lines
//! are relayed to the engine while the link is up. Link loss is surfaced to
//! dashboard sessions and left to the operator; there is no auto-reconnect.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};

use crate::config::EngineConfig;
use crate::hub::registry::BroadcastHub;
use crate::ingest::event::{record_line, Origin};
use crate::ingest::offsets::OffsetTable;
use crate::protocol::{LineCodec, ServerMessage};

const FORWARD_CHANNEL_CAPACITY: usize = 1024;

/// Spawns the link task and returns the channel producer connections use to
/// relay records into the engine.
pub fn spawn(
    config: &EngineConfig,
    table: Arc<OffsetTable>,
    hub: Arc<BroadcastHub>,
    max_line_len: usize,
) -> mpsc::Sender<String> {
    let (forward_tx, forward_rx) = mpsc::channel(FORWARD_CHANNEL_CAPACITY);
    let addr = format!("{}:{}", config.host, config.port);

    tokio::spawn(run(addr, table, hub, forward_rx, max_line_len));

    forward_tx
}

async fn run(
    addr: String,
    table: Arc<OffsetTable>,
    hub: Arc<BroadcastHub>,
    mut forward_rx: mpsc::Receiver<String>,
    max_line_len: usize,
) {
    let stream = match TcpStream::connect(&addr).await {
        Ok(stream) => {
            tracing::info!("[EngineLink] connected to engine {}", addr);
            stream
        }
        Err(e) => {
            tracing::warn!("[EngineLink] could not connect to engine {}: {}", addr, e);
            hub.broadcast(&ServerMessage::Error {
                message: format!("engine error: {}", e),
            });
            return;
        }
    };

    let (reader, writer) = stream.into_split();
    let mut framed_reader = FramedRead::new(reader, LineCodec::new(max_line_len));
    let mut framed_writer = FramedWrite::new(writer, LineCodec::new(max_line_len));

    loop {
        tokio::select! {
            inbound = framed_reader.next() => {
                match inbound {
                    Some(Ok(record)) => record_line(&table, &record, Origin::Engine),
                    Some(Err(e)) => {
                        tracing::warn!("[EngineLink] engine read error: {}", e);
                        hub.broadcast(&ServerMessage::Error {
                            message: format!("engine error: {}", e),
                        });
                        break;
                    }
                    None => {
                        tracing::warn!("[EngineLink] engine connection closed");
                        hub.broadcast(&ServerMessage::Error {
                            message: "engine connection closed".to_string(),
                        });
                        break;
                    }
                }
            }
            forwarded = forward_rx.recv() => {
                match forwarded {
                    Some(record) => {
                        if let Err(e) = framed_writer.send(record).await {
                            tracing::warn!("[EngineLink] engine write error: {}", e);
                            hub.broadcast(&ServerMessage::Error {
                                message: format!("engine error: {}", e),
                            });
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }
}
