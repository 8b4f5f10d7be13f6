//! HTTP server components.
//!
//! - **Server**: shared state, router and the serve loop
//! - **Handlers**: project CRUD, dashboard payload, health
//!
//! Requires the `rpc-server` feature.

pub mod handlers;
pub mod server;

pub use handlers::{ApiError, ErrorBody};
pub use server::*;
