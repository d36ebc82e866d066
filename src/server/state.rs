/**
 * Application State
 *
 * `AppState` is the state container handed to the router. It holds the
 * relay service (the only shared mutable state in the process; see the
 * relay module docs for the locking discipline) and the immutable
 * configuration.
 *
 * `FromRef` implementations let handlers extract just the piece they
 * need: the transports take `State<Relay>`, the gateway takes the whole
 * `AppState` for the secret.
 */

use crate::relay::Relay;
use crate::server::config::RelayConfig;
use axum::extract::FromRef;

/// Shared application state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The relay core: connection registry + room multiplexer.
    pub relay: Relay,
    /// Environment-sourced configuration (port, client origin, secret).
    pub config: RelayConfig,
}

impl AppState {
    pub fn new(relay: Relay, config: RelayConfig) -> Self {
        Self { relay, config }
    }
}

/// Allow handlers to extract `State<Relay>` directly.
impl FromRef<AppState> for Relay {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.relay.clone()
    }
}

/// Allow handlers to extract `State<RelayConfig>` directly.
impl FromRef<AppState> for RelayConfig {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
