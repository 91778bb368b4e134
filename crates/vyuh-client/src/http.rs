//! HTTP Crew API
//!
//! REST/JSON contract, fixed by the backend collaborator:
//!
//! - `GET  /api/agents`              catalog mapping, id -> agent
//! - `POST /api/launch`              `{crew, topic}` -> `{session_id, ...}`
//! - `GET  /api/result/{session_id}` `{content}` when ready, 404 until then

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use vyuh_core::{
    AgentCatalog, CrewApi, LaunchRequest, LaunchResponse, PollStatus, Result, SessionId,
    VyuhError,
};

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Backend connection configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the backend service, no trailing slash
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.into(),
        }
    }
}

impl ClientConfig {
    /// Read `VYUH_BACKEND_URL`, falling back to localhost
    pub fn from_env() -> Self {
        let base_url = std::env::var("VYUH_BACKEND_URL")
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.into());
        Self { base_url }
    }
}

/// Error body shape the backend uses for launch rejections
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Result-endpoint body once the session has resolved
#[derive(Debug, Deserialize)]
struct ResultBody {
    content: String,
}

/// HTTP crew backend
pub struct HttpCrewApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpCrewApi {
    /// Create against a specific base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(ClientConfig {
            base_url: base_url.into(),
        })
    }

    /// Create from configuration
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl CrewApi for HttpCrewApi {
    async fn fetch_agents(&self) -> Result<AgentCatalog> {
        let url = self.url("/api/agents");
        tracing::debug!(url = %url, "fetching agent catalog");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| VyuhError::CatalogLoad(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VyuhError::CatalogLoad(format!(
                "HTTP status {}",
                status.as_u16()
            )));
        }

        response
            .json::<AgentCatalog>()
            .await
            .map_err(|e| VyuhError::CatalogLoad(e.to_string()))
    }

    async fn launch(&self, request: &LaunchRequest) -> Result<LaunchResponse> {
        let url = self.url("/api/launch");
        tracing::debug!(url = %url, crew = request.crew.len(), "submitting launch");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| VyuhError::Launch {
                status: None,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            // Best-effort extraction of the backend's {detail} message,
            // falling back to the raw status code
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail)
                .unwrap_or_else(|| format!("HTTP status {}", status.as_u16()));
            return Err(VyuhError::Launch {
                status: Some(status.as_u16()),
                detail,
            });
        }

        response.json().await.map_err(|e| VyuhError::Launch {
            status: Some(status.as_u16()),
            detail: e.to_string(),
        })
    }

    async fn fetch_result(&self, session: &SessionId) -> Result<PollStatus> {
        let url = self.url(&format!("/api/result/{}", session));
        tracing::debug!(url = %url, "polling for result");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| VyuhError::Poll(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let body: ResultBody = response
                    .json()
                    .await
                    .map_err(|e| VyuhError::Poll(e.to_string()))?;
                Ok(PollStatus::Ready(body.content))
            }
            StatusCode::NOT_FOUND => Ok(PollStatus::Pending),
            other => Err(VyuhError::Poll(format!("HTTP status {}", other.as_u16()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_agents_parses_catalog() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/agents")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "researcher": {"role": "Researcher", "goal": "Find things"},
                    "writer": {"role": "Writer", "goal": "Write things", "backstory": "Ex-journalist"}
                }"#,
            )
            .create_async()
            .await;

        let api = HttpCrewApi::new(server.url());
        let catalog = api.fetch_agents().await.unwrap();

        mock.assert_async().await;
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog["writer"].backstory.as_deref(), Some("Ex-journalist"));
    }

    #[tokio::test]
    async fn test_fetch_agents_failure_is_catalog_load_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/agents")
            .with_status(503)
            .create_async()
            .await;

        let api = HttpCrewApi::new(server.url());
        let result = api.fetch_agents().await;
        assert!(matches!(result, Err(VyuhError::CatalogLoad(_))));
    }

    #[tokio::test]
    async fn test_launch_extracts_detail_from_error_body() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/launch")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "Crew list cannot be empty"}"#)
            .create_async()
            .await;

        let api = HttpCrewApi::new(server.url());
        let request = LaunchRequest {
            crew: vec!["researcher".into()],
            topic: "topic".into(),
        };

        match api.launch(&request).await {
            Err(VyuhError::Launch { status, detail }) => {
                assert_eq!(status, Some(400));
                assert_eq!(detail, "Crew list cannot be empty");
            }
            other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_launch_falls_back_to_status_code() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/launch")
            .with_status(502)
            .with_body("<html>bad gateway</html>")
            .create_async()
            .await;

        let api = HttpCrewApi::new(server.url());
        let request = LaunchRequest {
            crew: vec!["researcher".into()],
            topic: "topic".into(),
        };

        match api.launch(&request).await {
            Err(VyuhError::Launch { detail, .. }) => {
                assert_eq!(detail, "HTTP status 502");
            }
            other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_launch_success_returns_session() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/launch")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"session_id": "s1", "data": "generated text"}"#)
            .create_async()
            .await;

        let api = HttpCrewApi::new(server.url());
        let request = LaunchRequest {
            crew: vec!["researcher".into(), "writer".into()],
            topic: "the future of content creation".into(),
        };

        let response = api.launch(&request).await.unwrap();
        mock.assert_async().await;
        assert_eq!(response.session_id.as_str(), "s1");
        assert_eq!(response.data.as_deref(), Some("generated text"));
    }

    #[tokio::test]
    async fn test_result_ready_pending_and_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/result/ready")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content": "done"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/result/pending")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/api/result/broken")
            .with_status(500)
            .create_async()
            .await;

        let api = HttpCrewApi::new(server.url());

        let ready = api
            .fetch_result(&SessionId::from_string("ready"))
            .await
            .unwrap();
        assert_eq!(ready, PollStatus::Ready("done".into()));

        let pending = api
            .fetch_result(&SessionId::from_string("pending"))
            .await
            .unwrap();
        assert_eq!(pending, PollStatus::Pending);

        let broken = api.fetch_result(&SessionId::from_string("broken")).await;
        assert!(matches!(broken, Err(VyuhError::Poll(_))));
    }
}
