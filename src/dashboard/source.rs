//! Dashboard data sources for the server.
//!
//! Every `load` returns a complete payload. Nothing is cached between
//! calls; the file source re-reads its file each time.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::data::DashboardData;
use crate::error::{Error, Result};

/// Where the server gets its dashboard payload
pub trait DashboardSource: Send + Sync {
    /// Load a full payload
    fn load(&self) -> Result<DashboardData>;

    /// Short description for logs
    fn describe(&self) -> String;
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILE SOURCE
// ═══════════════════════════════════════════════════════════════════════════════

/// JSON file written by an external updater
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source reading `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path being read
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DashboardSource for FileSource {
    fn load(&self) -> Result<DashboardData> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::Source(format!("{}: {}", self.path.display(), e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Deserialization(format!("{}: {}", self.path.display(), e)))
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATIC SOURCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Payload held in memory
#[derive(Debug)]
pub struct StaticSource {
    data: RwLock<DashboardData>,
}

impl StaticSource {
    /// Create a source serving `data`
    pub fn new(data: DashboardData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Swap the served payload
    pub fn replace(&self, data: DashboardData) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|e| Error::Internal(format!("Lock error: {}", e)))?;
        *guard = data;
        Ok(())
    }
}

impl DashboardSource for StaticSource {
    fn load(&self) -> Result<DashboardData> {
        let guard = self
            .data
            .read()
            .map_err(|e| Error::Internal(format!("Lock error: {}", e)))?;
        Ok(guard.clone())
    }

    fn describe(&self) -> String {
        "static payload".into()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::data::MetricBlock;
    use chrono::Utc;

    #[test]
    fn test_file_source_rereads_each_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        let source = FileSource::new(&path);

        let mut data = DashboardData::placeholder(Utc::now());
        std::fs::write(&path, serde_json::to_string(&data).unwrap()).unwrap();
        assert_eq!(source.load().unwrap().pos.open_issues, 0);

        data.pos = MetricBlock::new("down", 4, Utc::now());
        std::fs::write(&path, serde_json::to_string(&data).unwrap()).unwrap();
        let reloaded = source.load().unwrap();
        assert_eq!(reloaded.pos.open_issues, 4);
        assert_eq!(reloaded.pos.status, "down");
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/projboard/dashboard.json");
        assert!(matches!(source.load(), Err(Error::Source(_))));
        assert!(source.describe().contains("dashboard.json"));
    }

    #[test]
    fn test_file_source_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, "{\"pos\": 1}").unwrap();

        assert!(matches!(FileSource::new(&path).load(), Err(Error::Deserialization(_))));
    }

    #[test]
    fn test_static_source_replace() {
        let source = StaticSource::new(DashboardData::placeholder(Utc::now()));
        assert!(source.load().unwrap().all_healthy());

        let mut next = DashboardData::placeholder(Utc::now());
        next.ai = MetricBlock::new("failing", 2, Utc::now());
        source.replace(next).unwrap();
        assert!(!source.load().unwrap().all_healthy());
    }
}
