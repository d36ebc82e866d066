/**
 * Room Multiplexer
 *
 * Maps room identifiers to the set of connections subscribed to them.
 * Rooms have no durable state: an entry is created lazily on first join
 * and dropped as soon as its member count reaches zero, which makes the
 * empty-room invariant directly observable through `room_size`.
 */

use crate::relay::registry::ConnectionId;
use crate::shared::room::RoomId;
use std::collections::{HashMap, HashSet};

/// Room membership map.
#[derive(Debug, Default)]
pub struct RoomMultiplexer {
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
}

impl RoomMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a room, creating the room entry if absent.
    /// Returns true when the membership is new (false on a repeat join).
    pub fn add_member(&mut self, room: RoomId, connection: ConnectionId) -> bool {
        self.rooms.entry(room).or_default().insert(connection)
    }

    /// Remove a connection from a room. When the member set becomes
    /// empty the room entry itself is dropped; there is no state worth
    /// keeping for a memberless room. Returns true when the connection
    /// was actually a member.
    pub fn remove_member(&mut self, room: &RoomId, connection: &ConnectionId) -> bool {
        let Some(members) = self.rooms.get_mut(room) else {
            return false;
        };
        let removed = members.remove(connection);
        if members.is_empty() {
            self.rooms.remove(room);
        }
        removed
    }

    /// Drop a room entirely, returning its former members. Used by the
    /// gateway's `group:deleted` eviction.
    pub fn remove_room(&mut self, room: &RoomId) -> Option<HashSet<ConnectionId>> {
        self.rooms.remove(room)
    }

    /// Current members of a room. An unknown room is an empty room.
    pub fn members(&self, room: &RoomId) -> impl Iterator<Item = &ConnectionId> {
        self.rooms.get(room).into_iter().flatten()
    }

    pub fn is_member(&self, room: &RoomId, connection: &ConnectionId) -> bool {
        self.rooms
            .get(room)
            .map(|members| members.contains(connection))
            .unwrap_or(false)
    }

    /// Member count for a room; zero for a room that does not exist.
    pub fn room_size(&self, room: &RoomId) -> usize {
        self.rooms.get(room).map(HashSet::len).unwrap_or(0)
    }

    /// Number of rooms that currently have at least one member.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
