pub mod config;
pub mod engine;
pub mod hub;
pub mod ingest;
pub mod protocol;
pub mod snapshot;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{Config, GatewayMode};
use crate::engine::client::EngineClient;
use crate::hub::registry::BroadcastHub;
use crate::ingest::offsets::OffsetTable;
use crate::snapshot::builder::SnapshotSource;

// ========================================
// GATEWAY (The Singleton)
// ========================================

/// The central state of the gateway.
/// This struct is cheap to clone (all fields are Arcs or Copy).
#[derive(Clone)]
pub struct PulseGateway {
    pub offsets: Arc<OffsetTable>,
    pub hub: Arc<BroadcastHub>,
    pub source: Arc<SnapshotSource>,
    pub tick: Duration,
    pub start_time: Instant,
}

impl PulseGateway {
    pub fn new(config: &Config) -> Self {
        let offsets = Arc::new(OffsetTable::new());
        let hub = Arc::new(BroadcastHub::new(config.snapshot.default_group.clone()));

        let source = match config.snapshot.mode {
            GatewayMode::Direct => SnapshotSource::Direct(offsets.clone()),
            GatewayMode::Polling => SnapshotSource::Polling(EngineClient::from_config(&config.engine)),
        };

        Self {
            offsets,
            hub,
            source: Arc::new(source),
            tick: Duration::from_millis(config.snapshot.tick_ms),
            start_time: Instant::now(),
        }
    }
}
