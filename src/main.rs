use tracing_subscriber::EnvFilter;

use pulsegate::config::Config;
use pulsegate::snapshot::builder::SnapshotSource;
use pulsegate::{engine, hub, ingest, PulseGateway};

// ========================================
// MAIN ENTRY POINT
// ========================================

#[tokio::main]
async fn main() {
    let config = Config::global();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.server.log_level)
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let gateway = PulseGateway::new(config);

    tracing::info!(
        "[Gateway] starting in {} mode (tick {}ms)",
        gateway.source.mode(),
        config.snapshot.tick_ms
    );

    match &*gateway.source {
        SnapshotSource::Direct(table) => {
            // Persistent engine link: engine output is counted too, and
            // producer records are relayed into the engine while it is up.
            let forward = engine::link::spawn(
                &config.engine,
                table.clone(),
                gateway.hub.clone(),
                config.server.max_line_len,
            );

            let producer_addr = format!("{}:{}", config.server.host, config.server.producer_port);
            tokio::spawn(ingest::producer::start(
                producer_addr,
                table.clone(),
                Some(forward),
                config.server.max_line_len,
            ));

            tokio::spawn(hub::ticker::run_direct_ticker(
                gateway.hub.clone(),
                table.clone(),
                gateway.tick,
            ));
        }
        SnapshotSource::Polling(_) => {
            // Sessions drive their own timers; nothing to start here.
            tracing::info!(
                "[Gateway] polling engine at {}:{}",
                config.engine.host,
                config.engine.port
            );
        }
    }

    hub::server::serve(gateway, &config.server.host, config.server.dashboard_port).await;
}
