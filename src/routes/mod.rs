//! Route Configuration
//!
//! Route table assembly for the relay's HTTP surface.

/// Router assembly
pub mod router;

pub use router::create_router;
