//! REST client for the projboard server.
//!
//! Wraps a `reqwest::Client` and maps transport and status failures onto
//! [`Error`]. There is no retry; a failed call surfaces to the caller.

use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::core::project::{NewProject, Project, ProjectId};
use crate::dashboard::data::DashboardData;
use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration for the HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            user_agent: format!("projboard/{}", crate::VERSION),
        }
    }
}

/// Error body returned by the server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Health check body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInfo {
    /// Reported status
    pub status: String,
    /// Service name
    pub service: String,
    /// Server version
    pub version: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// API CLIENT
// ═══════════════════════════════════════════════════════════════════════════════

/// HTTP client for the projects and dashboard endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// HTTP client
    client: Client,
    /// Base URL without trailing slash
    base_url: String,
}

impl ApiClient {
    /// Create a new client for `base_url`
    pub fn new(base_url: impl Into<String>, config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::InvalidParameter {
                name: "base_url".into(),
                reason: "cannot be empty".into(),
            });
        }

        Ok(Self { client, base_url })
    }

    /// Create with default configuration
    pub fn with_defaults(base_url: impl Into<String>) -> Result<Self> {
        Self::new(base_url, HttpClientConfig::default())
    }

    /// Base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /projects
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let response = self
            .client
            .get(self.url("/projects"))
            .send()
            .await
            .map_err(|e| Error::Http(format!("List projects failed: {}", e)))?;

        Self::json(Self::expect(response, StatusCode::OK).await?).await
    }

    /// POST /projects
    pub async fn add_project(&self, project: &NewProject) -> Result<Project> {
        let response = self
            .client
            .post(self.url("/projects"))
            .json(project)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Add project failed: {}", e)))?;

        Self::json(Self::expect(response, StatusCode::CREATED).await?).await
    }

    /// DELETE /projects/{id}
    pub async fn delete_project(&self, id: ProjectId) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/projects/{}", id)))
            .send()
            .await
            .map_err(|e| Error::Http(format!("Delete project failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::ProjectNotFound(id));
        }
        Self::expect(response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    /// GET /api/dashboard-data
    pub async fn fetch_dashboard(&self) -> Result<DashboardData> {
        let response = self
            .client
            .get(self.url("/api/dashboard-data"))
            .send()
            .await
            .map_err(|e| Error::Http(format!("Dashboard request failed: {}", e)))?;

        Self::json(Self::expect(response, StatusCode::OK).await?).await
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthInfo> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| Error::Http(format!("Health check failed: {}", e)))?;

        Self::json(Self::expect(response, StatusCode::OK).await?).await
    }

    /// Pass the response through if it has the expected status
    async fn expect(response: Response, expected: StatusCode) -> Result<Response> {
        let status = response.status();
        if status == expected {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("unexpected status").to_string()
                } else {
                    body
                }
            });

        Err(Error::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| Error::Deserialization(format!("Failed to parse response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = ApiClient::with_defaults("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/projects"), "http://localhost:5000/projects");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        assert!(matches!(
            ApiClient::with_defaults("/"),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout_ms, 10_000);
        assert!(config.user_agent.starts_with("projboard/"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        let config = HttpClientConfig {
            timeout_ms: 500,
            ..Default::default()
        };
        // Port 9 (discard) on loopback is almost never listening
        let client = ApiClient::new("http://127.0.0.1:9", config).unwrap();
        let err = client.list_projects().await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert!(err.is_recoverable());
    }
}
