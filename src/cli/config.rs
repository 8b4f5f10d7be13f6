//! CLI and server configuration.
//!
//! Both configurations load from JSON files and accept environment
//! overrides.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::dashboard::alerts::{AlertThresholds, DEFAULT_OPEN_ISSUES_THRESHOLD};

// ═══════════════════════════════════════════════════════════════════════════════
// CLI CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// CLI Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Server base URL
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Dashboard refresh interval in seconds
    pub refresh_interval_secs: u64,
    /// Colored terminal output
    pub color: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000".into(),
            timeout_secs: 30,
            refresh_interval_secs: 300,
            color: true,
        }
    }
}

impl CliConfig {
    /// Create new configuration
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Load from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(e.to_string()))?;

        serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from file when it exists, otherwise defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        std::fs::write(path, content)
            .map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Apply environment overrides
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("PROJBOARD_API_URL") {
            self.api_url = url;
        }

        if let Ok(timeout) = std::env::var("PROJBOARD_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                self.timeout_secs = secs;
            }
        }

        if let Ok(refresh) = std::env::var("PROJBOARD_REFRESH_SECS") {
            if let Ok(secs) = refresh.parse() {
                self.refresh_interval_secs = secs;
            }
        }

        if std::env::var_os("NO_COLOR").is_some() {
            self.color = false;
        }

        self
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        default_config_dir().join("config.json")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Validation("API URL cannot be empty".into()));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation("Timeout must be greater than 0".into()));
        }

        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "Refresh interval must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVER CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Server Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: String,
    /// JSON file holding the dashboard payload; placeholder data when unset
    pub dashboard_path: Option<PathBuf>,
    /// Open-issue threshold for derived alerts
    pub open_issues_threshold: u64,
    /// Append threshold alerts to each dashboard payload
    pub derive_alerts: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".into(),
            dashboard_path: None,
            open_issues_threshold: DEFAULT_OPEN_ISSUES_THRESHOLD,
            derive_alerts: true,
        }
    }
}

impl ServerConfig {
    /// Load from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(e.to_string()))?;

        serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Apply environment overrides
    pub fn with_env(mut self) -> Self {
        if let Ok(bind) = std::env::var("PROJBOARD_BIND") {
            self.bind = bind;
        }

        if let Ok(path) = std::env::var("PROJBOARD_DASHBOARD_FILE") {
            self.dashboard_path = Some(PathBuf::from(path));
        }

        if let Ok(threshold) = std::env::var("PROJBOARD_OPEN_ISSUES_THRESHOLD") {
            if let Ok(value) = threshold.parse() {
                self.open_issues_threshold = value;
            }
        }

        if let Ok(flag) = std::env::var("PROJBOARD_DERIVE_ALERTS") {
            self.derive_alerts = parse_flag(&flag).unwrap_or(self.derive_alerts);
        }

        self
    }

    /// Parsed listen address
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|e| ConfigError::Validation(format!("Invalid bind address {}: {}", self.bind, e)))
    }

    /// Thresholds for derived alerts
    pub fn thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            open_issues: self.open_issues_threshold,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration error
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error
    Io(String),
    /// Parse error
    Parse(String),
    /// Serialization error
    Serialize(String),
    /// Validation error
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
            ConfigError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPER FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse common boolean spellings
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Get default config directory
fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("projboard");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".config/projboard");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library/Application Support/projboard");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("projboard");
        }
    }

    PathBuf::from(".projboard")
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
