//! Server state and router.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};
use tokio::sync::RwLock;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::handlers;
use crate::core::registry::ProjectRegistry;
use crate::dashboard::alerts::AlertRules;
use crate::dashboard::source::DashboardSource;
use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// SERVER STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Shared application state
pub struct AppState {
    /// Project registry
    pub registry: RwLock<ProjectRegistry>,
    /// Dashboard payload source
    pub source: Arc<dyn DashboardSource>,
    /// Alert rules applied to each payload, if enabled
    pub rules: Option<AlertRules>,
}

impl AppState {
    /// Create state with an empty registry
    pub fn new(source: Arc<dyn DashboardSource>) -> Self {
        Self {
            registry: RwLock::new(ProjectRegistry::new()),
            source,
            rules: None,
        }
    }

    /// Derive alerts with `rules` on every dashboard request
    pub fn with_rules(mut self, rules: AlertRules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Start from an existing registry
    pub fn with_registry(mut self, registry: ProjectRegistry) -> Self {
        self.registry = RwLock::new(registry);
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROUTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Projects
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::add_project),
        )
        .route("/projects/:id", delete(handlers::delete_project))

        // Dashboard
        .route("/api/dashboard-data", get(handlers::dashboard_data))

        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind `addr` and serve until the listener fails
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Io(format!("bind {}: {}", addr, e)))?;

    info!("Starting projboard server on {}", addr);
    info!("API endpoints:");
    info!("  GET    /health              - Health check");
    info!("  GET    /projects            - List projects");
    info!("  POST   /projects            - Create project");
    info!("  DELETE /projects/:id        - Delete project");
    info!("  GET    /api/dashboard-data  - Dashboard payload");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| Error::Io(format!("server: {}", e)))
}
