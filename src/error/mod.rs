//! Relay Error Module
//!
//! Error types for the relay's HTTP surface and their conversion to
//! responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports
//! ├── types.rs      - RelayError definition
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! All handlers return `Result<_, RelayError>`; the conversion module
//! turns an error into the `{"error": <message>}` JSON body the callers
//! expect, with the status code each variant maps to.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::RelayError;
