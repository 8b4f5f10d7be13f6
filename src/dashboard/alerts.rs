//! Threshold alert rules and the alert archive.
//!
//! Rules derive alerts from metric blocks; the archive writes a batch of
//! alerts to a timestamped JSON file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::data::{Alert, AlertSeverity, DashboardData};
use crate::error::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// THRESHOLDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default open-issue threshold per subsystem
pub const DEFAULT_OPEN_ISSUES_THRESHOLD: u64 = 10;

/// Alert thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Open issues above this value raise a high alert
    pub open_issues: u64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            open_issues: DEFAULT_OPEN_ISSUES_THRESHOLD,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RULES
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives alerts from dashboard metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertRules {
    thresholds: AlertThresholds,
}

impl AlertRules {
    /// Create rules with the given thresholds
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    /// Get thresholds
    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Alerts for every subsystem over threshold
    pub fn evaluate(&self, data: &DashboardData) -> Vec<Alert> {
        let limit = self.thresholds.open_issues;

        data.metrics()
            .iter()
            .filter(|(_, block)| block.open_issues > limit)
            .map(|(subsystem, block)| {
                Alert::new(
                    AlertSeverity::High,
                    format!("High number of open issues in {}", subsystem.label()),
                    format!(
                        "There are {} open issues (threshold: {})",
                        block.open_issues, limit
                    ),
                )
            })
            .collect()
    }

    /// Append derived alerts after the source alerts, skipping duplicate titles
    pub fn annotate(&self, mut data: DashboardData) -> DashboardData {
        let derived = self.evaluate(&data);
        for alert in derived {
            if data.alerts.iter().any(|a| a.title == alert.title) {
                continue;
            }
            debug!(title = %alert.title, "derived alert");
            data.alerts.push(alert);
        }
        data
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ARCHIVE
// ═══════════════════════════════════════════════════════════════════════════════

/// Writes alert batches to `<dir>/alerts_<YYYYmmdd_HHMM>.json`
#[derive(Debug, Clone)]
pub struct AlertArchive {
    dir: PathBuf,
}

impl AlertArchive {
    /// Create an archive rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Archive directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path used for a batch saved at `now`
    pub fn path_for(&self, now: DateTime<Utc>) -> PathBuf {
        self.dir
            .join(format!("alerts_{}.json", now.format("%Y%m%d_%H%M")))
    }

    /// Save a batch; empty batches are not written
    pub fn save(&self, alerts: &[Alert], now: DateTime<Utc>) -> Result<Option<PathBuf>> {
        if alerts.is_empty() {
            return Ok(None);
        }

        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(now);
        let content = serde_json::to_string_pretty(alerts)?;
        std::fs::write(&path, content)?;

        info!(count = alerts.len(), path = %path.display(), "alerts archived");
        Ok(Some(path))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::data::MetricBlock;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 8, 5, 0).unwrap()
    }

    fn data_with_issues(pos: u64, ai: u64, chain: u64) -> DashboardData {
        let mut data = DashboardData::placeholder(now());
        data.pos = MetricBlock::new("healthy", pos, now());
        data.ai = MetricBlock::new("healthy", ai, now());
        data.blockchain = MetricBlock::new("healthy", chain, now());
        data
    }

    #[test]
    fn test_threshold_is_strict() {
        let rules = AlertRules::default();
        assert!(rules.evaluate(&data_with_issues(10, 0, 0)).is_empty());

        let alerts = rules.evaluate(&data_with_issues(11, 0, 25));
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].title, "High number of open issues in POS");
        assert_eq!(alerts[0].message, "There are 11 open issues (threshold: 10)");
        assert_eq!(alerts[1].title, "High number of open issues in Blockchain");
        assert!(alerts.iter().all(|a| a.severity.is_high()));
    }

    #[test]
    fn test_custom_threshold() {
        let rules = AlertRules::new(AlertThresholds { open_issues: 2 });
        assert_eq!(rules.evaluate(&data_with_issues(3, 3, 1)).len(), 2);
    }

    #[test]
    fn test_annotate_appends_without_duplicates() {
        let rules = AlertRules::default();
        let mut data = data_with_issues(0, 40, 0);
        data.alerts.push(Alert::new(AlertSeverity::Low, "Deploy done", "v1.2"));

        let annotated = rules.annotate(data);
        assert_eq!(annotated.alerts.len(), 2);
        assert_eq!(annotated.alerts[0].title, "Deploy done");

        let again = rules.annotate(annotated.clone());
        assert_eq!(again.alerts, annotated.alerts);
    }

    #[test]
    fn test_archive_writes_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let archive = AlertArchive::new(dir.path().join("alerts"));
        let alerts = vec![Alert::new(AlertSeverity::High, "t", "m")];

        let path = archive.save(&alerts, now()).unwrap().unwrap();
        assert!(path.ends_with("alerts_20240309_0805.json"));

        let saved: Vec<Alert> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, alerts);
    }

    #[test]
    fn test_archive_skips_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let archive = AlertArchive::new(dir.path().join("alerts"));

        assert_eq!(archive.save(&[], now()).unwrap(), None);
        assert!(!archive.dir().exists());
    }
}
