//! Terminal front-ends.
//!
//! - **Form**: required-field entry for new projects
//! - **Board**: local project list state and its rendering
//! - **Render**: dashboard metric, alert and chart renderers

pub mod board;
pub mod form;
pub mod render;

pub use board::*;
pub use form::*;
pub use render::*;
