//! Status dashboard model.
//!
//! # Components
//!
//! - **Data**: metric blocks, alerts and chart series
//! - **Alerts**: threshold rules and the alert archive
//! - **Source**: where the server loads the payload from

pub mod alerts;
pub mod data;
pub mod source;

pub use alerts::*;
pub use data::*;
pub use source::*;
