/**
 * Server Initialization
 *
 * Wires the relay together: construct the relay core, build the app
 * state, assemble the router, and layer CORS + request tracing.
 *
 * # Initialization Steps
 *
 * 1. Create the `Relay` service (registry + multiplexer, empty)
 * 2. Build `AppState` with the configuration
 * 3. Assemble routes
 * 4. Layer CORS (restricted to the configured client origin) and tracing
 *
 * The relay holds no durable state, so there is nothing to restore:
 * every start is a cold start and clients rejoin their rooms on
 * reconnect.
 */

use crate::relay::Relay;
use crate::routes::router::create_router;
use crate::server::config::RelayConfig;
use crate::server::state::AppState;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create and configure the axum application.
pub fn create_app(config: RelayConfig) -> Router {
    tracing::info!("Initializing relay server");

    let relay = Relay::new();
    let state = AppState::new(relay, config.clone());

    let app = create_router(state)
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http());

    tracing::info!("Router configured (CORS origin: {})", config.client_url);
    app
}

/// CORS for the browser-facing endpoints: the configured client origin
/// only, GET/POST, credentials allowed (the web app sends its session
/// cookie along with the upgrade request).
fn cors_layer(config: &RelayConfig) -> CorsLayer {
    let origin = config
        .client_url
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| {
            tracing::warn!(
                "CLIENT_URL={} is not a valid origin, falling back to {}",
                config.client_url,
                crate::server::config::DEFAULT_CLIENT_URL
            );
            HeaderValue::from_static(crate::server::config::DEFAULT_CLIENT_URL)
        });

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true)
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(crate::relay::sse::CONNECTION_ID_HEADER),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_app_builds_router() {
        // Multiple instances must coexist (each owns its own relay).
        let _a = create_app(RelayConfig::default());
        let _b = create_app(RelayConfig::default());
    }
}
