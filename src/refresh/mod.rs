//! Dashboard refresh cycle.
//!
//! Timer → REST client → subscribers. Rendering is left to the subscriber
//! so the same service drives the terminal dashboard and tests.

pub mod service;

pub use service::*;
