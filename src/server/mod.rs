//! Server Setup
//!
//! Process-level wiring: configuration loading, shared application
//! state, and router construction.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports
//! ├── config.rs - Environment configuration
//! ├── state.rs  - AppState and FromRef extraction
//! └── init.rs   - create_app() wiring
//! ```

/// Environment configuration
pub mod config;

/// Server initialization
pub mod init;

/// Application state
pub mod state;

pub use config::RelayConfig;
pub use init::create_app;
pub use state::AppState;
