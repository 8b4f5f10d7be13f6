//! REST client side.
//!
//! - **Http**: `ApiClient` for the projects and dashboard endpoints
//! - **Manager**: the project manager session over a local board

pub mod http;
pub mod manager;

pub use http::*;
pub use manager::*;
