//! # projboard
//!
//! A small project registry served over REST, a terminal project manager
//! that talks to it, and a status dashboard that polls an aggregate
//! payload on a fixed interval.
//!
//! ## Architecture
//!
//! - **Core**: project entities and the in-memory registry
//! - **Dashboard**: metric blocks, alerts, chart series and payload sources
//! - **Rpc**: the axum server exposing projects and dashboard data
//! - **Client**: REST client and the project manager session
//! - **Refresh**: timer-driven dashboard polling
//! - **View**: form, project board and dashboard renderers
//! - **Cli**: configuration and output formatting for the binaries
//!
//! ## Example
//!
//! ```rust,ignore
//! use projboard::prelude::*;
//!
//! let client = ApiClient::with_defaults("http://127.0.0.1:5000")?;
//! let mut manager = ProjectManager::new(client);
//! manager.refresh().await?;
//! println!("{}", manager.board().render(true));
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    unused_lifetimes,
    unused_qualifications
)]

pub mod cli;
pub mod core;
pub mod dashboard;
pub mod error;
pub mod view;

#[cfg(feature = "http-client")]
pub mod client;
#[cfg(feature = "http-client")]
pub mod refresh;
#[cfg(feature = "rpc-server")]
pub mod rpc;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        project::{NewProject, Project, ProjectId},
        registry::ProjectRegistry,
    };
    pub use crate::dashboard::{
        alerts::{AlertArchive, AlertRules, AlertThresholds},
        data::{Alert, AlertSeverity, DashboardData, MetricBlock, Subsystem},
        source::{DashboardSource, FileSource, StaticSource},
    };
    pub use crate::error::{Error, Result};
    pub use crate::view::{
        board::ProjectBoard,
        form::ProjectForm,
        render::DashboardRenderer,
    };

    #[cfg(feature = "http-client")]
    pub use crate::client::{ApiClient, ProjectManager};
    #[cfg(feature = "http-client")]
    pub use crate::refresh::{RefreshConfig, RefreshService};
    #[cfg(feature = "rpc-server")]
    pub use crate::rpc::{router, AppState};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
