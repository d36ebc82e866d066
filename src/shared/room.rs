/**
 * Room Identifier Normalization
 *
 * Callers address rooms with values that may arrive as JSON strings or
 * numbers (the web client passes numeric-looking chat ids in several
 * places). Every map lookup in the relay uses `RoomId`, and the only way
 * to obtain one is through the conversions in this module, so the
 * string-vs-number coercion happens in exactly one place.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized room identifier.
///
/// Rooms name either a chat conversation, a per-user notification channel
/// (`user_<id>`), or an ad-hoc test channel. A room has no existence
/// beyond the set of connections currently joined to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Create a room id from an already-normalized string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A room identifier as it appears on the wire: string or number.
///
/// Deserialized untagged so `"42"`, `42` and `4.2` are all accepted;
/// conversion to `RoomId` renders numbers in their decimal form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRoomId {
    Text(String),
    Int(i64),
    Float(f64),
}

impl RawRoomId {
    /// True when the raw value would be rejected as "missing" by the
    /// gateway validation (an empty string names no room).
    pub fn is_empty(&self) -> bool {
        matches!(self, RawRoomId::Text(s) if s.is_empty())
    }
}

impl From<RawRoomId> for RoomId {
    fn from(raw: RawRoomId) -> Self {
        match raw {
            RawRoomId::Text(s) => RoomId(s),
            RawRoomId::Int(n) => RoomId(n.to_string()),
            RawRoomId::Float(n) => RoomId(n.to_string()),
        }
    }
}

/// The `chatId` field of an internal notify request: one room or a list
/// of rooms. The overloaded wire shape is preserved for compatibility
/// with existing callers; internally it immediately becomes a
/// `Vec<RoomId>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RoomTargets {
    One(RawRoomId),
    Many(Vec<RawRoomId>),
}

impl RoomTargets {
    /// Normalize into the list of target rooms.
    pub fn into_room_ids(self) -> Vec<RoomId> {
        match self {
            RoomTargets::One(raw) => vec![raw.into()],
            RoomTargets::Many(raws) => raws.into_iter().map(RoomId::from).collect(),
        }
    }

    /// True when the value counts as missing for validation purposes
    /// (a single empty string).
    pub fn is_empty(&self) -> bool {
        matches!(self, RoomTargets::One(raw) if raw.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_id_passes_through() {
        let raw: RawRoomId = serde_json::from_str("\"chat1\"").unwrap();
        assert_eq!(RoomId::from(raw), RoomId::new("chat1"));
    }

    #[test]
    fn test_numeric_id_normalizes_to_string() {
        let raw: RawRoomId = serde_json::from_str("42").unwrap();
        assert_eq!(RoomId::from(raw), RoomId::new("42"));
    }

    #[test]
    fn test_numeric_and_string_forms_match() {
        let a: RawRoomId = serde_json::from_str("7").unwrap();
        let b: RawRoomId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(RoomId::from(a), RoomId::from(b));
    }

    #[test]
    fn test_scalar_target_becomes_single_room() {
        let targets: RoomTargets = serde_json::from_str("\"chat1\"").unwrap();
        assert_eq!(targets.into_room_ids(), vec![RoomId::new("chat1")]);
    }

    #[test]
    fn test_array_target_preserves_order() {
        let targets: RoomTargets = serde_json::from_str(r#"["chat1", 42, "user_7"]"#).unwrap();
        assert_eq!(
            targets.into_room_ids(),
            vec![RoomId::new("chat1"), RoomId::new("42"), RoomId::new("user_7")]
        );
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let targets: RoomTargets = serde_json::from_str("\"\"").unwrap();
        assert!(targets.is_empty());

        let targets: RoomTargets = serde_json::from_str("\"chat1\"").unwrap();
        assert!(!targets.is_empty());
    }
}
