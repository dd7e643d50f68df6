//! Engine Query Client: one short-lived connection per call, one JSON request
//! terminated by a newline, resolved with the first newline-terminated JSON
//! response or an error. The protocol is request/response, not streaming:
//! the connection is dropped after the first complete record regardless of
//! outcome.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use crate::config::EngineConfig;
use crate::engine::errors::EngineError;
use crate::engine::protocol::{EngineRequest, GroupStatsResponse, TopicsResponse};
use crate::protocol::{LineCodec, DEFAULT_MAX_LINE_LEN};

#[derive(Debug, Clone)]
pub struct EngineClient {
    host: String,
    port: u16,
    timeout: Duration,
}

impl EngineClient {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.host.clone(), config.port, Duration::from_millis(config.timeout_ms))
    }

    /// Sends one request and resolves with the first complete JSON record.
    /// The whole connect/write/read exchange shares the configured budget.
    /// Concurrent calls each open independent connections.
    pub async fn query(&self, request: &EngineRequest) -> Result<Value, EngineError> {
        let payload = serde_json::to_string(request)
            .map_err(|e| EngineError::Protocol(format!("unencodable request: {}", e)))?;

        match tokio::time::timeout(self.timeout, self.exchange(payload)).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(self.timeout)),
        }
    }

    pub async fn fetch_topics(&self) -> Result<TopicsResponse, EngineError> {
        let value = self.query(&EngineRequest::Topics).await?;
        serde_json::from_value(value)
            .map_err(|e| EngineError::Protocol(format!("malformed TOPICS response: {}", e)))
    }

    /// Returns the engine's `stats` document verbatim.
    pub async fn fetch_group_stats(&self, group: &str) -> Result<Value, EngineError> {
        let value = self
            .query(&EngineRequest::GroupStats { group: group.to_string() })
            .await?;
        let response: GroupStatsResponse = serde_json::from_value(value)
            .map_err(|e| EngineError::Protocol(format!("malformed GROUP_STATS response: {}", e)))?;
        Ok(response.stats)
    }

    async fn exchange(&self, payload: String) -> Result<Value, EngineError> {
        let stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| EngineError::Connection(e.to_string()))?;

        let mut framed = Framed::new(stream, LineCodec::new(DEFAULT_MAX_LINE_LEN));
        framed.send(payload).await?;

        match framed.next().await {
            Some(Ok(record)) => serde_json::from_str(&record)
                .map_err(|_| EngineError::Protocol(format!("invalid JSON from engine: {}", record))),
            Some(Err(e)) => Err(e.into()),
            None => Err(EngineError::Connection("engine closed before replying".to_string())),
        }
    }
}
