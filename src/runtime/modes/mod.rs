//! Mode routing
//!
//! - Server mode (HTTP + WebSocket)
//! - CLI mode (account / config management)

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "server")]
pub use server::{configure_app, run_server};

#[cfg(feature = "cli")]
pub use cli::run_cli;
