//! Shared Wire Types
//!
//! Types that define the relay's wire contract, used by every transport
//! and by the internal notify gateway:
//!
//! - **`event`** - The outbound event envelope and well-known event names
//! - **`room`** - Room identifier normalization (string-or-number coercion)
//!
//! Room normalization lives here deliberately: the original service
//! coerced ids to strings at each call site and membership lookups broke
//! whenever one site was missed. Centralizing the coercion removes that
//! bug class.

/// Outbound event envelope and event-name constants
pub mod event;

/// Room identifier types and normalization
pub mod room;

pub use event::RelayEvent;
pub use room::{RawRoomId, RoomId, RoomTargets};
