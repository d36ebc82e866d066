//! Relay Core
//!
//! The relay is a pure fan-out layer: it tracks live connections, the
//! rooms they have joined, and delivers events to room members. It holds
//! no message history and no durable state: everything here is rebuilt
//! from zero on restart, and clients are expected to rejoin their rooms
//! after reconnecting.
//!
//! # Module Structure
//!
//! ```text
//! relay/
//! ├── mod.rs      - Relay service object (atomic membership operations)
//! ├── registry.rs - Connection Registry (per-connection bookkeeping)
//! ├── rooms.rs    - Room Multiplexer (room → member set)
//! ├── events.rs   - Inbound client protocol and dispatch
//! ├── socket.rs   - WebSocket transport
//! └── sse.rs      - SSE + HTTP-emit fallback transport
//! ```
//!
//! # Consistency
//!
//! A connection's room set and a room's member set are mutual inverses.
//! Every public operation on [`Relay`] takes the internal lock exactly
//! once and mutates both maps inside it, so the invariant holds at every
//! point an observer can see, the Rust rendition of the original
//! single-threaded event-loop guarantee. No operation blocks on I/O while
//! holding the lock; deliveries go through unbounded channels.

/// Inbound client protocol and dispatch
pub mod events;

/// Connection lifecycle bookkeeping
pub mod registry;

/// Room membership and broadcast targeting
pub mod rooms;

/// WebSocket transport (primary)
pub mod socket;

/// SSE fallback transport
pub mod sse;

use crate::shared::event::{names, RelayEvent};
use crate::shared::room::RoomId;
use registry::{ConnectionId, ConnectionRegistry};
use rooms::RoomMultiplexer;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

struct RelayInner {
    registry: ConnectionRegistry,
    rooms: RoomMultiplexer,
}

/// The relay service: registry + multiplexer behind one lock.
///
/// Cloneable and cheap to share; construct one per process in
/// `create_app` (or one per test; instances are fully independent).
#[derive(Clone)]
pub struct Relay {
    inner: Arc<Mutex<RelayInner>>,
}

impl Relay {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RelayInner {
                registry: ConnectionRegistry::new(),
                rooms: RoomMultiplexer::new(),
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RelayInner> {
        // The lock is only held for map mutations; a poisoned lock means
        // a panic mid-mutation, which we treat as fatal.
        self.inner.lock().expect("relay state lock poisoned")
    }

    /// Register a new connection and deliver its `connected` handshake.
    /// The caller keeps the receiving half of `sender` and forwards
    /// events to its transport.
    pub fn connect(&self, sender: mpsc::UnboundedSender<RelayEvent>) -> ConnectionId {
        let id = ConnectionId::new();
        let mut inner = self.lock();
        inner.registry.insert(id, sender);
        inner.registry.deliver(&id, &RelayEvent::connected(&id));
        tracing::info!("[Relay] Connection established: {}", id);
        id
    }

    /// Tear down a connection: leave every joined room (notifying the
    /// remaining members) and drop the registry entry. Safe to call for
    /// an id that is already gone.
    pub fn disconnect(&self, id: &ConnectionId, reason: &str) {
        let mut inner = self.lock();
        let Some(handle) = inner.registry.remove(id) else {
            return;
        };
        for room in handle.rooms() {
            inner.rooms.remove_member(room, id);
            let notice = RelayEvent::membership(names::USER_LEFT_ROOM, id, room);
            Self::deliver_to_room(&inner, room, &notice, Some(id));
        }
        tracing::info!("[Relay] Connection closed: {} (reason: {})", id, reason);
    }

    /// Join a room, creating it if absent, and notify the other members.
    ///
    /// Joining an already-joined room must not error; the membership add
    /// is idempotent and the notice is re-broadcast, matching the
    /// original service.
    pub fn join(&self, id: &ConnectionId, room: RoomId) {
        let mut inner = self.lock();
        if !inner.registry.track_join(id, room.clone()) {
            tracing::warn!("[Relay] Join from unknown connection {}", id);
            return;
        }
        inner.rooms.add_member(room.clone(), *id);
        tracing::info!("[Relay] {} joined room {}", id, room);

        let notice = RelayEvent::membership(names::USER_JOINED_ROOM, id, &room);
        Self::deliver_to_room(&inner, &room, &notice, Some(id));
    }

    /// Leave a room and notify the remaining members.
    pub fn leave(&self, id: &ConnectionId, room: &RoomId) {
        let mut inner = self.lock();
        inner.registry.track_leave(id, room);
        inner.rooms.remove_member(room, id);
        tracing::info!("[Relay] {} left room {}", id, room);

        let notice = RelayEvent::membership(names::USER_LEFT_ROOM, id, room);
        Self::deliver_to_room(&inner, room, &notice, Some(id));
    }

    /// Broadcast an event to every member of a room, optionally skipping
    /// one connection (the sender of a typing indicator, for instance).
    /// Broadcasting to an empty or unknown room is a silent no-op.
    /// Returns the number of connections the event was handed to.
    pub fn broadcast_to_room(
        &self,
        room: &RoomId,
        event: &str,
        payload: Value,
        exclude: Option<&ConnectionId>,
    ) -> usize {
        let inner = self.lock();
        let event = RelayEvent::new(event, payload);
        let delivered = Self::deliver_to_room(&inner, room, &event, exclude);
        tracing::debug!(
            "[Relay] Broadcast \"{}\" to room {} reached {} connection(s)",
            event.event,
            room,
            delivered
        );
        delivered
    }

    /// Fan one event into several rooms. A connection that belongs to
    /// more than one of the targets receives one copy per room
    /// membership, since the gateway's callers rely on per-room delivery
    /// (e.g. the chat room plus each participant's `user_<id>` room).
    /// Returns the total number of deliveries across all rooms.
    pub fn broadcast_to_rooms(&self, rooms: &[RoomId], event: &str, payload: Value) -> usize {
        let inner = self.lock();
        let event = RelayEvent::new(event, payload);
        let mut delivered = 0;
        for room in rooms {
            delivered += Self::deliver_to_room(&inner, room, &event, None);
        }
        delivered
    }

    /// Forcibly remove every member of a room, without `user_left_room`
    /// notices. Models "this room must stop existing": no further events
    /// reach it, and a later join starts a fresh, empty room.
    pub fn evict_room(&self, room: &RoomId) {
        let mut inner = self.lock();
        let Some(members) = inner.rooms.remove_room(room) else {
            return;
        };
        for member in &members {
            inner.registry.track_leave(member, room);
        }
        tracing::info!(
            "[Relay] Evicted {} connection(s) from room {}",
            members.len(),
            room
        );
    }

    /// Whether a connection id is currently registered.
    pub fn is_connected(&self, id: &ConnectionId) -> bool {
        self.lock().registry.contains(id)
    }

    /// Rooms joined by a connection (diagnostics/testing).
    pub fn rooms_of(&self, id: &ConnectionId) -> Vec<RoomId> {
        self.lock()
            .registry
            .rooms_of(id)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Member count of a room; zero when the room does not exist.
    pub fn room_size(&self, room: &RoomId) -> usize {
        self.lock().rooms.room_size(room)
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.lock().registry.len()
    }

    fn deliver_to_room(
        inner: &RelayInner,
        room: &RoomId,
        event: &RelayEvent,
        exclude: Option<&ConnectionId>,
    ) -> usize {
        let mut delivered = 0;
        for member in inner.rooms.members(room) {
            if Some(member) == exclude {
                continue;
            }
            if inner.registry.deliver(member, event) {
                delivered += 1;
            }
        }
        delivered
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}
