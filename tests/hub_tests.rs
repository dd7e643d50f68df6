use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use pulsegate::hub::BroadcastHub;
use pulsegate::ingest::OffsetTable;
use pulsegate::protocol::ServerMessage;
use pulsegate::snapshot::{direct_core, GroupStatsView};

fn hub() -> Arc<BroadcastHub> {
    Arc::new(BroadcastHub::new("g1".to_string()))
}

async fn recv(rx: &mut mpsc::UnboundedReceiver<ServerMessage>) -> ServerMessage {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for a message")
        .expect("channel closed")
}

mod direct_ticker {
    use super::*;
    use pulsegate::hub::ticker::run_direct_ticker;

    #[tokio::test]
    async fn sessions_receive_snapshots_from_local_counts_alone() {
        let hub = hub();
        let table = Arc::new(OffsetTable::new());

        // No engine anywhere: snapshots are driven purely by the table.
        table.record_event("orders", 0);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let _guard = hub.register(tx);

        let ticker = tokio::spawn(run_direct_ticker(
            hub.clone(),
            table.clone(),
            Duration::from_millis(20),
        ));

        let message = recv(&mut rx).await;
        let ServerMessage::Snapshot(snapshot) = message else {
            panic!("expected a snapshot");
        };
        assert_eq!(snapshot.derived.total_end, 1);
        assert_eq!(snapshot.topics[0].topic, "orders");

        ticker.abort();
    }
}

mod registry {
    use super::*;

    #[tokio::test]
    async fn broadcast_reaches_every_session() {
        let hub = hub();

        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let _guard_a = hub.register(tx_a);
        let _guard_b = hub.register(tx_b);

        hub.broadcast(&ServerMessage::Error {
            message: "engine connection closed".to_string(),
        });

        assert!(matches!(recv(&mut rx_a).await, ServerMessage::Error { .. }));
        assert!(matches!(recv(&mut rx_b).await, ServerMessage::Error { .. }));
    }

    #[tokio::test]
    async fn pushing_to_a_closed_session_is_a_noop() {
        let hub = hub();

        let (tx_dead, rx_dead) = mpsc::unbounded_channel();
        let (tx_live, mut rx_live) = mpsc::unbounded_channel();
        let _guard_dead = hub.register(tx_dead);
        let _guard_live = hub.register(tx_live);

        // The client went away but the session has not been removed yet.
        drop(rx_dead);

        hub.broadcast(&ServerMessage::Error { message: "x".to_string() });

        assert!(matches!(recv(&mut rx_live).await, ServerMessage::Error { .. }));
    }

    #[tokio::test]
    async fn dropping_the_guard_removes_the_session() {
        let hub = hub();

        let (tx, _rx) = mpsc::unbounded_channel();
        let guard = hub.register(tx);
        assert_eq!(hub.len(), 1);

        drop(guard);
        assert_eq!(hub.len(), 0);
    }

    #[tokio::test]
    async fn sessions_start_on_the_default_group() {
        let hub = hub();

        let (tx, _rx) = mpsc::unbounded_channel();
        let guard = hub.register(tx);

        assert_eq!(guard.selected_group(), "g1");
    }

    #[tokio::test]
    async fn set_group_affects_only_that_session() {
        let hub = hub();

        let table = OffsetTable::new();
        table.record_event("orders", 0);
        let core = direct_core(&table);

        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let guard_a = hub.register(tx_a);
        let _guard_b = hub.register(tx_b);

        guard_a.set_group("g2".to_string());

        hub.broadcast_with(|group| ServerMessage::Snapshot(core.for_group(group)));

        let group_of = |message: ServerMessage| -> String {
            let ServerMessage::Snapshot(snapshot) = message else {
                panic!("expected a snapshot");
            };
            let GroupStatsView::Built(stats) = snapshot.group_stats else {
                panic!("expected built group stats");
            };
            stats.group
        };

        assert_eq!(group_of(recv(&mut rx_a).await), "g2");
        assert_eq!(group_of(recv(&mut rx_b).await), "g1");
    }
}
