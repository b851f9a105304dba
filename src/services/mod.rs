//! Service layer for business logic
//!
//! Shared between the HTTP handlers and the CLI.

mod link_service;
mod path_allocator;
mod rate_limiter;

pub use link_service::*;
pub use path_allocator::*;
pub use rate_limiter::*;
