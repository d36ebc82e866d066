/**
 * Connection Registry
 *
 * Lifecycle bookkeeping per connection: each live connection gets an
 * opaque id at connect time, a delivery channel, and a set of rooms it
 * currently belongs to. The registry owns the connection entries; room
 * membership is mirrored in the room multiplexer, and the relay service
 * keeps the two sides consistent by mutating both under one lock.
 */

use crate::shared::event::RelayEvent;
use crate::shared::room::RoomId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Opaque identifier assigned to a connection at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh connection id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ConnectionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Per-connection registry entry: the delivery channel plus the set of
/// rooms the connection has joined.
#[derive(Debug)]
pub struct ConnectionHandle {
    sender: mpsc::UnboundedSender<RelayEvent>,
    rooms: HashSet<RoomId>,
}

impl ConnectionHandle {
    fn new(sender: mpsc::UnboundedSender<RelayEvent>) -> Self {
        Self {
            sender,
            rooms: HashSet::new(),
        }
    }

    /// Rooms this connection currently belongs to.
    pub fn rooms(&self) -> &HashSet<RoomId> {
        &self.rooms
    }
}

/// Registry of live connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, ConnectionHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection with an empty room set.
    ///
    /// Registering an id twice replaces the previous entry (last write
    /// wins), though transports never do this because ids are freshly
    /// generated.
    pub fn insert(&mut self, id: ConnectionId, sender: mpsc::UnboundedSender<RelayEvent>) {
        self.connections.insert(id, ConnectionHandle::new(sender));
    }

    /// Remove a connection entry, returning it so the caller can unwind
    /// its room memberships.
    pub fn remove(&mut self, id: &ConnectionId) -> Option<ConnectionHandle> {
        self.connections.remove(id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Rooms joined by a connection (diagnostics/testing read access).
    pub fn rooms_of(&self, id: &ConnectionId) -> Option<&HashSet<RoomId>> {
        self.connections.get(id).map(ConnectionHandle::rooms)
    }

    /// Record a room in the connection's room set. Returns false for an
    /// unknown connection.
    pub fn track_join(&mut self, id: &ConnectionId, room: RoomId) -> bool {
        match self.connections.get_mut(id) {
            Some(handle) => {
                handle.rooms.insert(room);
                true
            }
            None => false,
        }
    }

    /// Drop a room from the connection's room set.
    pub fn track_leave(&mut self, id: &ConnectionId, room: &RoomId) {
        if let Some(handle) = self.connections.get_mut(id) {
            handle.rooms.remove(room);
        }
    }

    /// Deliver an event to one connection. Best-effort: a closed channel
    /// (receiver task already gone) is logged and ignored.
    pub fn deliver(&self, id: &ConnectionId, event: &RelayEvent) -> bool {
        match self.connections.get(id) {
            Some(handle) => match handle.sender.send(event.clone()) {
                Ok(()) => true,
                Err(_) => {
                    tracing::debug!("[Registry] Delivery channel closed for {}", id);
                    false
                }
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (
        mpsc::UnboundedSender<RelayEvent>,
        mpsc::UnboundedReceiver<RelayEvent>,
    ) {
        mpsc::unbounded_channel()
    }

    #[test]
    fn test_insert_starts_with_empty_room_set() {
        let mut registry = ConnectionRegistry::new();
        let id = ConnectionId::new();
        let (tx, _rx) = channel();

        registry.insert(id, tx);

        assert!(registry.contains(&id));
        assert!(registry.rooms_of(&id).unwrap().is_empty());
    }

    #[test]
    fn test_track_join_and_leave() {
        let mut registry = ConnectionRegistry::new();
        let id = ConnectionId::new();
        let (tx, _rx) = channel();
        registry.insert(id, tx);

        assert!(registry.track_join(&id, RoomId::new("chat1")));
        assert!(registry.rooms_of(&id).unwrap().contains(&RoomId::new("chat1")));

        registry.track_leave(&id, &RoomId::new("chat1"));
        assert!(registry.rooms_of(&id).unwrap().is_empty());
    }

    #[test]
    fn test_track_join_unknown_connection() {
        let mut registry = ConnectionRegistry::new();
        assert!(!registry.track_join(&ConnectionId::new(), RoomId::new("chat1")));
    }

    #[test]
    fn test_deliver_reaches_receiver() {
        let mut registry = ConnectionRegistry::new();
        let id = ConnectionId::new();
        let (tx, mut rx) = channel();
        registry.insert(id, tx);

        let event = RelayEvent::new("receive_message", serde_json::json!({"content": "hi"}));
        assert!(registry.deliver(&id, &event));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.event, "receive_message");
    }

    #[test]
    fn test_deliver_to_closed_channel_is_best_effort() {
        let mut registry = ConnectionRegistry::new();
        let id = ConnectionId::new();
        let (tx, rx) = channel();
        registry.insert(id, tx);
        drop(rx);

        let event = RelayEvent::new("receive_message", serde_json::json!({}));
        assert!(!registry.deliver(&id, &event));
    }

    #[test]
    fn test_remove_returns_joined_rooms() {
        let mut registry = ConnectionRegistry::new();
        let id = ConnectionId::new();
        let (tx, _rx) = channel();
        registry.insert(id, tx);
        registry.track_join(&id, RoomId::new("a"));
        registry.track_join(&id, RoomId::new("b"));

        let handle = registry.remove(&id).unwrap();
        assert_eq!(handle.rooms().len(), 2);
        assert!(!registry.contains(&id));
    }

    #[test]
    fn test_connection_id_parses_from_string() {
        let id = ConnectionId::new();
        let parsed: ConnectionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
