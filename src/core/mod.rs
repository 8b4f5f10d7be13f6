//! Core modules for projboard.
//!
//! This module contains the fundamental building blocks:
//! - Project entities and the create payload
//! - The in-memory project registry

pub mod project;
pub mod registry;

pub use project::*;
pub use registry::*;
