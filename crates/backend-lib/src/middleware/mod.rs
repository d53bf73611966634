// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the campus API.

pub mod session;

pub use session::require_session;
