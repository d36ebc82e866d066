/**
 * Internal Notification Gateway
 *
 * `POST /internal/notify` is the narrow, secret-authenticated surface the
 * stateless API tier uses to push events into rooms after a durable
 * write (new message persisted, group deleted/joined/left). Never called
 * by browsers.
 *
 * The caller contract is write-then-notify: by the time a notification
 * reaches the relay, the authoritative record is already readable from
 * the database, so a client receiving the event can immediately re-fetch
 * it. The relay itself enforces nothing here beyond the shared secret.
 *
 * # Request
 *
 * ```http
 * POST /internal/notify HTTP/1.1
 * x-internal-secret: <shared secret>
 *
 * { "event": "receive_message", "chatId": ["chat1", "user_42"], "payload": { ... } }
 * ```
 *
 * `chatId` is one room or a list of rooms (the wire name is kept for
 * caller compatibility; it really means "target rooms" and is converted
 * to one immediately after validation).
 */

use crate::error::RelayError;
use crate::server::state::AppState;
use crate::shared::event::names;
use crate::shared::room::{RoomId, RoomTargets};
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use subtle::ConstantTimeEq;

/// Header carrying the shared secret.
pub const INTERNAL_SECRET_HEADER: &str = "x-internal-secret";

/// Body of an internal notify request. Fields are optional so that
/// validation, not deserialization, decides what "missing" means.
#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    /// Event name to emit into the target rooms.
    pub event: Option<String>,
    /// One room or a list of rooms (see module docs on the naming).
    #[serde(rename = "chatId")]
    pub chat_id: Option<RoomTargets>,
    /// Opaque payload forwarded verbatim to room members.
    #[serde(default)]
    pub payload: Value,
}

/// Success response: how many rooms the event was fanned into.
#[derive(Debug, Serialize, Deserialize)]
pub struct NotifyResponse {
    pub success: bool,
    #[serde(rename = "roomsNotified")]
    pub rooms_notified: usize,
}

/// Handle an internal notify call (POST /internal/notify).
///
/// # Errors
///
/// * `403 Forbidden` - secret header absent or mismatched; nothing is
///   broadcast
/// * `400 Bad Request` - body missing `event` or `chatId` (an
///   unparseable body counts as missing both); nothing is broadcast
pub async fn notify_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<NotifyResponse>, RelayError> {
    // Secret check comes first: an unauthorized caller learns nothing
    // about body validation.
    let provided = headers
        .get(INTERNAL_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !secret_matches(provided, &state.config.internal_secret) {
        tracing::warn!("[Notify] Blocking unauthorized internal request");
        return Err(RelayError::Forbidden);
    }

    let request: NotifyRequest =
        serde_json::from_slice(&body).map_err(|_| RelayError::MissingField)?;

    let event = match request.event {
        Some(event) if !event.is_empty() => event,
        _ => {
            tracing::warn!("[Notify] Invalid request: missing event");
            return Err(RelayError::MissingField);
        }
    };
    let targets = match request.chat_id {
        Some(targets) if !targets.is_empty() => targets,
        _ => {
            tracing::warn!("[Notify] Invalid request: missing chatId");
            return Err(RelayError::MissingField);
        }
    };

    let target_rooms: Vec<RoomId> = targets.into_room_ids();
    tracing::info!(
        "[Notify] Event \"{}\" for {} room(s)",
        event,
        target_rooms.len()
    );

    state
        .relay
        .broadcast_to_rooms(&target_rooms, &event, request.payload);

    // A deleted group's rooms must stop existing: evict everyone after
    // the final broadcast so no further events can ever reach them.
    if event == names::GROUP_DELETED {
        for room in &target_rooms {
            state.relay.evict_room(room);
        }
    }

    Ok(Json(NotifyResponse {
        success: true,
        rooms_notified: target_rooms.len(),
    }))
}

/// Constant-time comparison of the provided secret against the
/// configured one. Length differences short-circuit, which leaks only
/// the length.
fn secret_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
