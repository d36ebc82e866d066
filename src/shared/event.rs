/**
 * Outbound Event Envelope
 *
 * Every event the relay delivers to a connection is one JSON frame:
 *
 * ```json
 * { "event": "<name>", "payload": { ... }, "timestamp": "<rfc3339>" }
 * ```
 *
 * The same envelope is used on both transports (WebSocket text frames and
 * SSE data lines), so clients parse deliveries identically regardless of
 * how they are connected.
 */

use crate::relay::registry::ConnectionId;
use crate::shared::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known outbound event names.
pub mod names {
    /// Handshake event carrying the connection's assigned id.
    pub const CONNECTED: &str = "connected";
    /// A connection joined a room (sent to the other members).
    pub const USER_JOINED_ROOM: &str = "user_joined_room";
    /// A connection left a room or disconnected (sent to remaining members).
    pub const USER_LEFT_ROOM: &str = "user_left_room";
    /// Typing indicator start.
    pub const GROUP_TYPING: &str = "group:typing";
    /// Typing indicator stop.
    pub const GROUP_STOP_TYPING: &str = "group:stop_typing";
    /// Message delivery (legacy client path and internal notify).
    pub const RECEIVE_MESSAGE: &str = "receive_message";
    /// Group deletion notice; triggers room eviction in the gateway.
    pub const GROUP_DELETED: &str = "group:deleted";
}

/// An event as delivered to a connected client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayEvent {
    /// Event name, e.g. `receive_message` or `group:typing`.
    pub event: String,
    /// Event payload (JSON-serializable data, shape depends on the event).
    pub payload: Value,
    /// RFC3339 timestamp of when the relay emitted the event.
    pub timestamp: String,
}

impl RelayEvent {
    /// Create a new event with the current timestamp.
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self {
            event: event.into(),
            payload,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Handshake event telling a fresh connection its id.
    pub fn connected(connection_id: &ConnectionId) -> Self {
        Self::new(
            names::CONNECTED,
            serde_json::json!({ "connectionId": connection_id.to_string() }),
        )
    }

    /// Room membership notice (`user_joined_room` / `user_left_room`).
    pub fn membership(event: &str, connection_id: &ConnectionId, room_id: &RoomId) -> Self {
        Self::new(
            event,
            serde_json::json!({
                "connectionId": connection_id.to_string(),
                "roomId": room_id.as_str(),
            }),
        )
    }

    /// Typing indicator (`group:typing` / `group:stop_typing`).
    ///
    /// Payload field names (`chatId`, `userId`) follow the wire contract
    /// the web client already consumes.
    pub fn typing(event: &str, room_id: &RoomId, connection_id: &ConnectionId) -> Self {
        Self::new(
            event,
            serde_json::json!({
                "chatId": room_id.as_str(),
                "userId": connection_id.to_string(),
            }),
        )
    }
}
