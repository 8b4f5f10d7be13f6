//! Dashboard payload types.
//!
//! The wire format uses camelCase keys (`openIssues`, `lastUpdate`,
//! `activityData`, `performanceData`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// SUBSYSTEM
// ═══════════════════════════════════════════════════════════════════════════════

/// Monitored subsystems, one metric block each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    /// Point-of-sale projects
    Pos,
    /// AI projects
    Ai,
    /// Blockchain projects
    Blockchain,
}

impl Subsystem {
    /// All subsystems in display order
    pub fn all() -> &'static [Subsystem] {
        &[Subsystem::Pos, Subsystem::Ai, Subsystem::Blockchain]
    }

    /// Payload key
    pub fn key(&self) -> &'static str {
        match self {
            Subsystem::Pos => "pos",
            Subsystem::Ai => "ai",
            Subsystem::Blockchain => "blockchain",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Subsystem::Pos => "POS",
            Subsystem::Ai => "AI",
            Subsystem::Blockchain => "Blockchain",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// METRIC BLOCK
// ═══════════════════════════════════════════════════════════════════════════════

/// Status string reported for a healthy subsystem
pub const HEALTHY: &str = "healthy";

/// Summary health indicator for one subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricBlock {
    /// `"healthy"` or any other status string
    pub status: String,
    /// Number of open issues
    pub open_issues: u64,
    /// Time of the last update
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub last_update: DateTime<Utc>,
}

impl MetricBlock {
    /// Create a metric block
    pub fn new(status: impl Into<String>, open_issues: u64, last_update: DateTime<Utc>) -> Self {
        Self {
            status: status.into(),
            open_issues,
            last_update,
        }
    }

    /// Healthy block with no open issues
    pub fn healthy(last_update: DateTime<Utc>) -> Self {
        Self::new(HEALTHY, 0, last_update)
    }

    /// Whether the status is exactly `"healthy"`
    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ALERT
// ═══════════════════════════════════════════════════════════════════════════════

/// Alert severity; anything other than `high` renders as a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Needs attention now
    High,
    /// Should be looked at
    Medium,
    /// Informational
    Low,
    /// Severity string not recognised
    #[serde(other)]
    Unknown,
}

impl AlertSeverity {
    /// Whether this is a high-severity alert
    pub fn is_high(&self) -> bool {
        matches!(self, AlertSeverity::High)
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::High => "high",
            AlertSeverity::Medium => "medium",
            AlertSeverity::Low => "low",
            AlertSeverity::Unknown => "unknown",
        }
    }
}

/// A severity-tagged notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Severity level
    pub severity: AlertSeverity,
    /// Short title
    pub title: String,
    /// Human-readable detail
    #[serde(default)]
    pub message: String,
}

impl Alert {
    /// Create an alert
    pub fn new(severity: AlertSeverity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            message: message.into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHART SERIES
// ═══════════════════════════════════════════════════════════════════════════════

/// Commit activity per label (line chart)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySeries {
    /// X-axis labels
    #[serde(default)]
    pub labels: Vec<String>,
    /// Commit counts
    #[serde(default)]
    pub commits: Vec<f64>,
}

impl ActivitySeries {
    /// Label/value pairs, truncated to the shorter side
    pub fn points(&self) -> Vec<(&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.commits.iter().copied())
            .collect()
    }
}

/// Performance score per label (bar chart)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSeries {
    /// X-axis labels
    #[serde(default)]
    pub labels: Vec<String>,
    /// Scores
    #[serde(default)]
    pub scores: Vec<f64>,
}

impl PerformanceSeries {
    /// Label/value pairs, truncated to the shorter side
    pub fn points(&self) -> Vec<(&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.scores.iter().copied())
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DASHBOARD DATA
// ═══════════════════════════════════════════════════════════════════════════════

/// Full dashboard payload, re-fetched wholesale on each refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    /// POS subsystem metrics
    pub pos: MetricBlock,
    /// AI subsystem metrics
    pub ai: MetricBlock,
    /// Blockchain subsystem metrics
    pub blockchain: MetricBlock,
    /// Active alerts
    #[serde(default)]
    pub alerts: Vec<Alert>,
    /// Commit activity
    #[serde(default)]
    pub activity_data: ActivitySeries,
    /// Performance scores
    #[serde(default)]
    pub performance_data: PerformanceSeries,
}

impl DashboardData {
    /// Healthy payload with no alerts and empty series
    pub fn placeholder(now: DateTime<Utc>) -> Self {
        Self {
            pos: MetricBlock::healthy(now),
            ai: MetricBlock::healthy(now),
            blockchain: MetricBlock::healthy(now),
            alerts: Vec::new(),
            activity_data: ActivitySeries::default(),
            performance_data: PerformanceSeries::default(),
        }
    }

    /// Metric block for a subsystem
    pub fn metric(&self, subsystem: Subsystem) -> &MetricBlock {
        match subsystem {
            Subsystem::Pos => &self.pos,
            Subsystem::Ai => &self.ai,
            Subsystem::Blockchain => &self.blockchain,
        }
    }

    /// All metric blocks in display order
    pub fn metrics(&self) -> [(Subsystem, &MetricBlock); 3] {
        [
            (Subsystem::Pos, &self.pos),
            (Subsystem::Ai, &self.ai),
            (Subsystem::Blockchain, &self.blockchain),
        ]
    }

    /// Number of high-severity alerts
    pub fn high_alert_count(&self) -> usize {
        self.alerts.iter().filter(|a| a.severity.is_high()).count()
    }

    /// Whether every subsystem reports healthy
    pub fn all_healthy(&self) -> bool {
        self.metrics().iter().all(|(_, block)| block.is_healthy())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TIMESTAMPS
// ═══════════════════════════════════════════════════════════════════════════════

/// Lenient `lastUpdate` parsing.
///
/// Accepts RFC 3339, ISO-8601 without an offset (taken as UTC, `T` or space
/// separated, optional fraction) and epoch milliseconds. Serialization is
/// always RFC 3339.
pub mod timestamp {
    use std::fmt;

    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::de::{self, Deserializer, Visitor};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    /// Parse a timestamp string
    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        let value = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    /// Epoch milliseconds to a timestamp
    pub fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(millis)
    }

    /// `deserialize_with` entry point
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TimestampVisitor)
    }

    struct TimestampVisitor;

    impl<'de> Visitor<'de> for TimestampVisitor {
        type Value = DateTime<Utc>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an ISO-8601 timestamp or epoch milliseconds")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            parse(value).ok_or_else(|| E::custom(format!("invalid timestamp: {}", value)))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            from_millis(value).ok_or_else(|| E::custom(format!("timestamp out of range: {}", value)))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            let millis = i64::try_from(value)
                .map_err(|_| E::custom(format!("timestamp out of range: {}", value)))?;
            self.visit_i64(millis)
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            if !value.is_finite() {
                return Err(E::custom("timestamp is not a finite number"));
            }
            self.visit_i64(value.round() as i64)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
