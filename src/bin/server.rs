//! projboard Server
//!
//! Serves the project registry and the dashboard payload over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};

use projboard::cli::ServerConfig;
use projboard::dashboard::alerts::AlertRules;
use projboard::dashboard::data::DashboardData;
use projboard::dashboard::source::{DashboardSource, FileSource, StaticSource};
use projboard::rpc::{self, AppState};

/// projboard server - project registry and dashboard API
#[derive(Parser)]
#[command(name = "projboard-server")]
#[command(version = projboard::VERSION)]
#[command(about = "HTTP server for projects and dashboard data", long_about = None)]
struct Args {
    /// Path to a JSON server configuration file
    #[arg(short, long, env = "PROJBOARD_SERVER_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address (overrides the configuration)
    #[arg(short, long)]
    bind: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAIN
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?.with_env(),
        None => ServerConfig::from_env(),
    };
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    config.validate()?;
    let addr = config.bind_addr()?;

    // Dashboard payload source
    let source: Arc<dyn DashboardSource> = match &config.dashboard_path {
        Some(path) => {
            if !path.exists() {
                warn!(path = %path.display(), "dashboard file does not exist yet");
            }
            Arc::new(FileSource::new(path.clone()))
        }
        None => {
            info!("no dashboard file configured, serving placeholder data");
            Arc::new(StaticSource::new(DashboardData::placeholder(Utc::now())))
        }
    };
    info!(source = %source.describe(), "dashboard source ready");

    let mut state = AppState::new(source);
    if config.derive_alerts {
        info!(
            open_issues_threshold = config.open_issues_threshold,
            "threshold alerts enabled"
        );
        state = state.with_rules(AlertRules::new(config.thresholds()));
    }

    rpc::serve(addr, Arc::new(state)).await?;
    Ok(())
}
