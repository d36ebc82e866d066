//! Internal Notification Gateway
//!
//! The trusted server-to-server surface: after the API tier persists a
//! write, it calls `POST /internal/notify` here to fan the corresponding
//! event into the affected rooms. Authentication is a shared secret in
//! the `x-internal-secret` header; end-user requests never reach this
//! module.

/// Notify endpoint handler
pub mod notify;

pub use notify::{notify_handler, NotifyRequest, NotifyResponse, INTERNAL_SECRET_HEADER};
