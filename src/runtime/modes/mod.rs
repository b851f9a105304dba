//! Mode routing
//!
//! - Server mode (HTTP server, default)
//! - CLI mode (link management and config generation)

pub mod cli;
pub mod server;

pub use cli::run_cli;
pub use server::run_server;
