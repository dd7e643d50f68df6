//! Direct-mode ticker: one global timer drives every session's snapshot.
//! The per-tick core (topic view, throughput, totals) is built once; only
//! the group label differs per session.

use std::sync::Arc;
use std::time::Duration;

use crate::hub::registry::BroadcastHub;
use crate::ingest::offsets::OffsetTable;
use crate::protocol::ServerMessage;
use crate::snapshot::builder::direct_core;

pub async fn run_direct_ticker(
    hub: Arc<BroadcastHub>,
    table: Arc<OffsetTable>,
    tick: Duration,
) {
    let mut interval = tokio::time::interval(tick);
    interval.tick().await; // skip the immediate first tick

    loop {
        interval.tick().await;

        let core = direct_core(&table);
        hub.broadcast_with(|group| ServerMessage::Snapshot(core.for_group(group)));
    }
}
