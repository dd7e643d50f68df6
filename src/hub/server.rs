//! Dashboard endpoint: WebSocket upgrade plus a small health document.
//! No rendering lives here; the gateway serves data, not UI.

use axum::{
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::hub::session;
use crate::PulseGateway;

pub async fn serve(gateway: PulseGateway, host: &str, port: u16) {
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(gateway);

    let addr = format!("{}:{}", host, port);
    tracing::info!("[Dashboard] WebSocket endpoint ws://{}/ws", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind dashboard port");

    axum::serve(listener, app).await.expect("Failed to start dashboard server");
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(gateway): State<PulseGateway>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| session::run_session(socket, gateway))
}

async fn health_handler(State(gateway): State<PulseGateway>) -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "mode": gateway.source.mode(),
        "sessions": gateway.hub.len(),
        "uptime_secs": gateway.start_time.elapsed().as_secs(),
    }))
}
