//! projboard Command Line Interface.
//!
//! Shared pieces of the `projboard` binary: configuration, output
//! formatting and the application context tying them together.

pub mod config;
pub mod output;

pub use config::*;
pub use output::*;

use std::path::PathBuf;

use crate::view::render::DashboardRenderer;

// ═══════════════════════════════════════════════════════════════════════════════
// CLI APPLICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// CLI Application state
#[derive(Debug)]
pub struct CliApp {
    /// Configuration
    config: CliConfig,
    /// Output formatter
    output: OutputFormatter,
    /// Verbose mode
    verbose: bool,
}

impl CliApp {
    /// Create new CLI application
    pub fn new(config: CliConfig) -> Self {
        let output = OutputFormatter::default().with_color(config.color);
        Self {
            config,
            output,
            verbose: false,
        }
    }

    /// Load configuration from `path` (or the default location) and apply
    /// environment overrides
    pub fn load(path: Option<PathBuf>) -> CliResult<Self> {
        let path = path.unwrap_or_else(CliConfig::default_path);
        let config = CliConfig::load_or_default(&path)?.with_env();
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output = OutputFormatter::new(format).with_color(self.config.color);
        self
    }

    /// Override the server URL
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Turn colored output off
    pub fn without_color(mut self) -> Self {
        self.config.color = false;
        self.output = self.output.with_color(false);
        self
    }

    /// Get configuration
    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Get output formatter
    pub fn output(&self) -> &OutputFormatter {
        &self.output
    }

    /// Check if verbose
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Dashboard renderer honoring the color setting
    pub fn renderer(&self) -> DashboardRenderer {
        DashboardRenderer::new(self.config.color)
    }

    /// HTTP client for the configured server
    #[cfg(feature = "http-client")]
    pub fn api_client(&self) -> CliResult<crate::client::ApiClient> {
        let http = crate::client::HttpClientConfig {
            timeout_ms: self.config.timeout_secs.saturating_mul(1000),
            ..Default::default()
        };
        crate::client::ApiClient::new(self.config.api_url.clone(), http)
            .map_err(|e| CliError::Config(e.to_string()))
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new(CliConfig::default())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLI RESULT
// ═══════════════════════════════════════════════════════════════════════════════

/// CLI Error types
#[derive(Debug, Clone)]
pub enum CliError {
    /// Configuration error
    Config(String),
    /// Connection error
    Connection(String),
    /// Server rejected the request
    Rejected(String),
    /// Invalid argument
    InvalidArgument(String),
    /// IO error
    Io(String),
    /// Any other command failure
    Execution(String),
}

impl CliError {
    /// Classify an error surfaced by a command handler
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        let err = match err.downcast::<crate::error::Error>() {
            Ok(err) => return err.into(),
            Err(err) => err,
        };
        let err = match err.downcast::<CliError>() {
            Ok(err) => return err,
            Err(err) => err,
        };
        match err.downcast::<ConfigError>() {
            Ok(err) => err.into(),
            Err(err) => CliError::Execution(format!("{:#}", err)),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Connection(msg) => write!(f, "Connection error: {}", msg),
            CliError::Rejected(msg) => write!(f, "Request rejected: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Io(msg) => write!(f, "IO error: {}", msg),
            CliError::Execution(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(msg) => CliError::Io(msg),
            other => CliError::Config(other.to_string()),
        }
    }
}

impl From<crate::error::Error> for CliError {
    fn from(err: crate::error::Error) -> Self {
        use crate::error::Error;

        match err {
            Error::Http(msg) => CliError::Connection(msg),
            Error::Io(msg) => CliError::Io(msg),
            Error::MissingField(_) | Error::InvalidParameter { .. } => {
                CliError::InvalidArgument(err.to_string())
            }
            other => CliError::Rejected(other.to_string()),
        }
    }
}

/// CLI Result type
pub type CliResult<T> = std::result::Result<T, CliError>;

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
