/**
 * Router Configuration
 *
 * The relay's full HTTP surface:
 *
 * - `GET  /health`           - liveness probe
 * - `GET  /socket`           - WebSocket upgrade (primary transport)
 * - `GET  /socket/sse`       - SSE subscription (fallback transport)
 * - `POST /socket/emit`      - inbound events from fallback clients
 * - `POST /internal/notify`  - trusted server-to-server event push
 *
 * Anything else is a 404.
 */

use crate::gateway::notify::notify_handler;
use crate::relay::socket::socket_handler;
use crate::relay::sse::{emit_handler, sse_handler};
use crate::server::state::AppState;
use axum::{response::Json, routing::get, routing::post, Router};
use serde_json::{json, Value};

/// Create the axum router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/socket", get(socket_handler))
        .route("/socket/sse", get(sse_handler))
        .route("/socket/emit", post(emit_handler))
        .route("/internal/notify", post(notify_handler))
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
        .with_state(state)
}

/// Health check (GET /health).
async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Relay server is running",
    }))
}
