#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// A fake upstream engine speaking the line-delimited request/response
/// protocol: one JSON request per line, one JSON response per line.
/// `reply` returning `None` keeps the connection silent (for timeout tests).
pub struct EngineStub {
    pub addr: SocketAddr,
    pub connections: Arc<AtomicUsize>,
}

impl EngineStub {
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

pub async fn spawn_engine_stub(
    reply: impl Fn(&Value) -> Option<String> + Send + Sync + 'static,
) -> EngineStub {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));

    let counter = connections.clone();
    let reply = Arc::new(reply);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);

            let reply = reply.clone();
            tokio::spawn(async move {
                let (reader, mut writer) = socket.split();
                let mut lines = BufReader::new(reader).lines();

                while let Ok(Some(line)) = lines.next_line().await {
                    let request: Value = serde_json::from_str(&line).unwrap_or(Value::Null);
                    match reply(&request) {
                        Some(response) => {
                            if writer.write_all(response.as_bytes()).await.is_err()
                                || writer.write_all(b"\n").await.is_err()
                            {
                                return;
                            }
                        }
                        None => {
                            // Hold the connection open without answering.
                            tokio::time::sleep(Duration::from_secs(30)).await;
                            return;
                        }
                    }
                }
            });
        }
    });

    EngineStub { addr, connections }
}

/// Polls `condition` until it holds or the deadline passes.
pub async fn wait_until(condition: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
