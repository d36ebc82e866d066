//! chat-relay - Real-Time Message Relay
//!
//! The chat application's real-time layer: a standalone process that
//! accepts persistent client connections, manages room membership, and
//! fans events out to connected clients. It is a pure fan-out layer:
//! the database the API tier writes to remains the source of truth, and
//! a relay outage degrades the product to refresh-to-see-messages, never
//! to data loss.
//!
//! # Data Flow
//!
//! Events reach clients one of two ways:
//!
//! 1. Client → relay → other clients in the room (typing indicators and
//!    the legacy `send_message` path)
//! 2. API tier → `POST /internal/notify` → clients in the room
//!    (authoritative message and group-lifecycle events, emitted after
//!    the durable write)
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types: the outbound event envelope and room id
//!   normalization
//! - **`relay`** - The core: connection registry, room multiplexer,
//!   client event dispatch, and both transports
//! - **`gateway`** - The secret-authenticated internal notify endpoint
//! - **`server`** - Configuration, state, and app wiring
//! - **`routes`** - Route table
//! - **`error`** - Error types and response conversion
//!
//! # Delivery Semantics
//!
//! At-most-once, best-effort: no acknowledgments, no retries, no
//! history. A disconnected client misses events until it reconnects and
//! re-syncs through the API.

/// Error types and HTTP conversion
pub mod error;

/// Internal notification gateway
pub mod gateway;

/// Relay core: registry, rooms, dispatch, transports
pub mod relay;

/// Route configuration
pub mod routes;

/// Server setup and configuration
pub mod server;

/// Shared wire types
pub mod shared;

pub use error::RelayError;
pub use relay::registry::ConnectionId;
pub use relay::Relay;
pub use server::{create_app, AppState, RelayConfig};
pub use shared::{RelayEvent, RoomId};
