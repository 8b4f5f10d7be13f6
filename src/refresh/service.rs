//! Scheduled dashboard refresh.
//!
//! The service fetches a full payload immediately on start and then on
//! every tick. Successful payloads are stored and broadcast to subscribers.
//! A failed fetch is logged and counted; the loop keeps going.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use projboard::client::ApiClient;
//! use projboard::refresh::{RefreshConfig, RefreshService};
//!
//! let client = ApiClient::with_defaults("http://127.0.0.1:5000")?;
//! let service = RefreshService::new(client, RefreshConfig::default());
//! let mut rx = service.subscribe();
//! let handle = service.start();
//!
//! while let Ok(data) = rx.recv().await {
//!     println!("{} alerts", data.alerts.len());
//! }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch, RwLock};
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::client::http::ApiClient;
use crate::dashboard::data::DashboardData;
use crate::error::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// FEED
// ═══════════════════════════════════════════════════════════════════════════════

/// Something that can produce a full dashboard payload
pub trait DashboardFeed: Send + Sync + 'static {
    /// Fetch the current payload
    fn fetch(&self) -> impl Future<Output = Result<DashboardData>> + Send;
}

impl DashboardFeed for ApiClient {
    fn fetch(&self) -> impl Future<Output = Result<DashboardData>> + Send {
        self.fetch_dashboard()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Default refresh interval (5 minutes)
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 5 * 60 * 1000;

/// Configuration for the refresh service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Time between refreshes in milliseconds
    pub interval_ms: u64,
    /// Capacity of the subscriber channel
    pub channel_capacity: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            channel_capacity: 16,
        }
    }
}

impl RefreshConfig {
    /// Refresh every `secs` seconds
    pub fn every_secs(secs: u64) -> Self {
        Self {
            interval_ms: secs.saturating_mul(1000),
            ..Default::default()
        }
    }

    /// Interval as a duration (never zero)
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Current refresh state
#[derive(Debug, Clone, Default)]
pub struct RefreshState {
    /// Last successfully fetched payload
    pub last: Option<DashboardData>,
    /// When `last` was fetched
    pub last_refresh_at: Option<DateTime<Utc>>,
    /// Total successful refreshes
    pub total_refreshes: u64,
    /// Total failed refreshes
    pub failed_refreshes: u64,
    /// Message of the most recent failure, cleared on success
    pub last_error: Option<String>,
    /// Is the background loop running
    pub is_running: bool,
    /// Generation of the loop that owns `is_running`
    generation: u64,
}

impl RefreshState {
    /// Success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.total_refreshes + self.failed_refreshes;
        if total == 0 {
            0.0
        } else {
            self.total_refreshes as f64 / total as f64 * 100.0
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REFRESH SERVICE
// ═══════════════════════════════════════════════════════════════════════════════

/// Background dashboard refresher
pub struct RefreshService<F: DashboardFeed> {
    /// Configuration
    config: RefreshConfig,
    /// Payload source
    feed: Arc<F>,
    /// Current state
    state: Arc<RwLock<RefreshState>>,
    /// Payload broadcaster
    tx: broadcast::Sender<DashboardData>,
    /// Loop generation; bumping it ends the running loop
    generation: watch::Sender<u64>,
}

impl<F: DashboardFeed> RefreshService<F> {
    /// Create a new refresh service
    pub fn new(feed: F, config: RefreshConfig) -> Self {
        let (tx, _) = broadcast::channel(config.channel_capacity.max(1));
        let (generation, _) = watch::channel(0);

        Self {
            config,
            feed: Arc::new(feed),
            state: Arc::new(RwLock::new(RefreshState::default())),
            tx,
            generation,
        }
    }

    /// Configuration
    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Receive every successful payload
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardData> {
        self.tx.subscribe()
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> RefreshState {
        self.state.read().await.clone()
    }

    /// Run one cycle inline
    pub async fn refresh_now(&self) -> Result<DashboardData> {
        run_cycle(self.feed.as_ref(), &self.state, &self.tx).await
    }

    /// Start the loop in the background (returns immediately).
    ///
    /// Starting again, or after [`stop`](Self::stop), replaces any loop
    /// still running; at most one loop runs per service.
    pub fn start(&self) -> tokio::task::JoinHandle<()> {
        let period = self.config.interval();
        let feed = Arc::clone(&self.feed);
        let state = Arc::clone(&self.state);
        let tx = self.tx.clone();

        let mut own = 0;
        self.generation.send_modify(|g| {
            *g += 1;
            own = *g;
        });
        let mut generation = self.generation.subscribe();

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            {
                // A newer loop may already own the state
                let mut s = state.write().await;
                if own > s.generation {
                    s.generation = own;
                    s.is_running = true;
                }
            }
            tracing::info!(interval_ms = period.as_millis() as u64, "dashboard refresh started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    changed = generation.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }

                if *generation.borrow() != own {
                    break;
                }

                // Failures are already logged and counted
                let _ = run_cycle(feed.as_ref(), &state, &tx).await;
            }

            {
                let mut s = state.write().await;
                if s.generation == own {
                    s.is_running = false;
                }
            }
            tracing::info!("dashboard refresh stopped");
        })
    }

    /// Stop the background loop
    pub fn stop(&self) {
        self.generation.send_modify(|g| *g += 1);
    }
}

/// One fetch → store → broadcast cycle
async fn run_cycle<F: DashboardFeed>(
    feed: &F,
    state: &RwLock<RefreshState>,
    tx: &broadcast::Sender<DashboardData>,
) -> Result<DashboardData> {
    let start = Instant::now();
    let result = feed.fetch().await;
    let duration_ms = start.elapsed().as_millis() as u64;

    let mut s = state.write().await;
    match result {
        Ok(data) => {
            s.total_refreshes += 1;
            s.last = Some(data.clone());
            s.last_refresh_at = Some(Utc::now());
            s.last_error = None;
            drop(s);

            // No subscribers is fine
            let _ = tx.send(data.clone());

            tracing::info!(
                alerts = data.alerts.len(),
                duration_ms,
                "dashboard data refreshed"
            );
            Ok(data)
        }
        Err(e) => {
            s.failed_refreshes += 1;
            s.last_error = Some(e.to_string());
            tracing::error!(error = %e, duration_ms, "error loading dashboard data");
            Err(e)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::data::MetricBlock;
    use crate::error::Error;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Plays back scripted results, then keeps failing
    struct ScriptedFeed {
        script: Mutex<VecDeque<Result<DashboardData>>>,
        calls: AtomicUsize,
    }

    impl ScriptedFeed {
        fn new(script: Vec<Result<DashboardData>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl DashboardFeed for ScriptedFeed {
        fn fetch(&self) -> impl Future<Output = Result<DashboardData>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Http("script exhausted".into())));
            async move { next }
        }
    }

    fn payload(issues: u64) -> DashboardData {
        let mut data = DashboardData::placeholder(Utc::now());
        data.pos = MetricBlock::new("healthy", issues, Utc::now());
        data
    }

    fn fast() -> RefreshConfig {
        RefreshConfig {
            interval_ms: 20,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_interval_is_five_minutes() {
        assert_eq!(RefreshConfig::default().interval(), Duration::from_secs(300));
        assert_eq!(RefreshConfig::every_secs(30).interval_ms, 30_000);
        assert_eq!(RefreshConfig { interval_ms: 0, ..Default::default() }.interval(), Duration::from_millis(1));
    }

    #[tokio::test]
    async fn test_refresh_now_stores_and_broadcasts() {
        let service = RefreshService::new(ScriptedFeed::new(vec![Ok(payload(3))]), fast());
        let mut rx = service.subscribe();

        let data = service.refresh_now().await.unwrap();
        assert_eq!(data.pos.open_issues, 3);
        assert_eq!(rx.recv().await.unwrap().pos.open_issues, 3);

        let state = service.state().await;
        assert_eq!(state.total_refreshes, 1);
        assert!(state.last_refresh_at.is_some());
        assert_eq!(state.success_rate(), 100.0);
    }

    #[tokio::test]
    async fn test_failure_keeps_last_payload() {
        let service = RefreshService::new(
            ScriptedFeed::new(vec![Ok(payload(1)), Err(Error::Http("down".into()))]),
            fast(),
        );

        service.refresh_now().await.unwrap();
        assert!(service.refresh_now().await.is_err());

        let state = service.state().await;
        assert_eq!(state.total_refreshes, 1);
        assert_eq!(state.failed_refreshes, 1);
        assert_eq!(state.last.unwrap().pos.open_issues, 1);
        assert!(state.last_error.unwrap().contains("down"));
    }

    #[tokio::test]
    async fn test_loop_survives_failures_and_stops() {
        let service = RefreshService::new(
            ScriptedFeed::new(vec![
                Err(Error::Http("first".into())),
                Ok(payload(5)),
                Err(Error::Status { status: 503, message: "busy".into() }),
                Ok(payload(6)),
            ]),
            fast(),
        );
        let mut rx = service.subscribe();
        let handle = service.start();

        let first = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        let second = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        assert_eq!(first.pos.open_issues, 5);
        assert_eq!(second.pos.open_issues, 6);

        service.stop();
        tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();

        let state = service.state().await;
        assert!(!state.is_running);
        assert_eq!(state.total_refreshes, 2);
        assert!(state.failed_refreshes >= 2);
        assert!(service.feed.calls.load(Ordering::SeqCst) >= 4);
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let script = (1..=20).map(|n| Ok(payload(n))).collect();
        let service = RefreshService::new(ScriptedFeed::new(script), fast());
        let mut rx = service.subscribe();

        let handle = service.start();
        tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        service.stop();
        tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
        assert!(!service.state().await.is_running);

        let before = service.state().await.total_refreshes;
        let handle = service.start();
        tokio::time::timeout(Duration::from_secs(5), async {
            while rx.recv().await.is_ok() {
                if service.state().await.total_refreshes > before {
                    break;
                }
            }
        })
        .await
        .unwrap();
        assert!(service.state().await.is_running);

        service.stop();
        tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
        assert!(!service.state().await.is_running);
    }

    #[tokio::test]
    async fn test_second_start_replaces_running_loop() {
        let script = (1..=50).map(|n| Ok(payload(n))).collect();
        let service = RefreshService::new(ScriptedFeed::new(script), fast());
        let mut rx = service.subscribe();

        let first = service.start();
        let second = service.start();

        // The first loop ends on its own once replaced
        tokio::time::timeout(Duration::from_secs(5), first).await.unwrap().unwrap();

        tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        assert!(service.state().await.is_running);

        service.stop();
        tokio::time::timeout(Duration::from_secs(5), second).await.unwrap().unwrap();
        assert!(!service.state().await.is_running);
    }
}
