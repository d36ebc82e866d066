/**
 * Inbound Client Protocol
 *
 * Events a connected client may send, as tagged JSON frames:
 *
 * ```json
 * { "type": "join_room", "roomId": "chat1" }
 * { "type": "group:typing", "roomId": 42 }
 * { "type": "send_message", "roomId": "chat1", "content": "hi" }
 * ```
 *
 * `roomId` accepts a string or a number on every event; normalization
 * happens through `shared::room` before any membership lookup. The same
 * parser serves both transports: WebSocket text frames and the fallback
 * `POST /socket/emit` body.
 *
 * No authorization is applied here. Callers are authenticated upstream
 * before they ever open a connection, and the relay has no access to the
 * chat records it would need to enforce membership; it fans out events,
 * nothing more.
 */

use crate::relay::registry::ConnectionId;
use crate::relay::Relay;
use crate::shared::event::names;
use crate::shared::room::{RawRoomId, RoomId};
use serde::Deserialize;
use serde_json::{Map, Value};

/// An event received from a connected client.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Subscribe the connection to a room.
    #[serde(rename = "join_room")]
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: RawRoomId,
    },

    /// Unsubscribe the connection from a room.
    #[serde(rename = "leave_room")]
    LeaveRoom {
        #[serde(rename = "roomId")]
        room_id: RawRoomId,
    },

    /// The client started typing in a room.
    #[serde(rename = "group:typing")]
    Typing {
        #[serde(rename = "roomId")]
        room_id: RawRoomId,
    },

    /// The client stopped typing in a room.
    #[serde(rename = "group:stop_typing")]
    StopTyping {
        #[serde(rename = "roomId")]
        room_id: RawRoomId,
    },

    /// Ad-hoc message relay. Legacy/manual-testing path: production
    /// message delivery goes through the internal notify gateway after
    /// the API tier has persisted the message.
    #[serde(rename = "send_message")]
    SendMessage {
        #[serde(rename = "roomId")]
        room_id: RawRoomId,
        #[serde(flatten)]
        data: Map<String, Value>,
    },
}

impl Relay {
    /// Dispatch one inbound client event.
    ///
    /// Typing indicators go to the other members of the room (never back
    /// to the sender); `send_message` re-broadcasts the full payload to
    /// every member including the sender.
    pub fn handle_client_event(&self, id: &ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::JoinRoom { room_id } => {
                self.join(id, room_id.into());
            }
            ClientEvent::LeaveRoom { room_id } => {
                self.leave(id, &room_id.into());
            }
            ClientEvent::Typing { room_id } => {
                self.relay_typing(id, &room_id.into(), names::GROUP_TYPING);
            }
            ClientEvent::StopTyping { room_id } => {
                self.relay_typing(id, &room_id.into(), names::GROUP_STOP_TYPING);
            }
            ClientEvent::SendMessage { room_id, data } => {
                let room: RoomId = room_id.into();
                let mut payload = data;
                payload.insert("roomId".to_string(), Value::String(room.to_string()));
                self.broadcast_to_room(&room, names::RECEIVE_MESSAGE, Value::Object(payload), None);
            }
        }
    }

    fn relay_typing(&self, id: &ConnectionId, room: &RoomId, event: &str) {
        let payload = serde_json::json!({
            "chatId": room.as_str(),
            "userId": id.to_string(),
        });
        self.broadcast_to_room(room, event, payload, Some(id));
    }
}
