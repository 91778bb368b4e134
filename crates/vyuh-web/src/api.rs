//! API Client
//!
//! Thin same-origin wrappers over the backend REST contract. Status-code
//! mapping lives here; the pages only see typed results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One agent definition from the catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub role: String,
    pub goal: String,
    #[serde(default)]
    pub backstory: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Catalog keyed by agent id, in stable display order
pub type AgentMap = BTreeMap<String, AgentInfo>;

/// Successful launch response
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LaunchData {
    pub session_id: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub crew: Option<Vec<String>>,
    /// Inline result text when the backend executed synchronously
    #[serde(default)]
    pub data: Option<String>,
}

/// Fetch the full agent catalog
pub async fn fetch_agents() -> Result<AgentMap, String> {
    let client = reqwest::Client::new();

    let response = client
        .get("/api/agents")
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(format!("HTTP error! status: {}", response.status().as_u16()));
    }

    response.json::<AgentMap>().await.map_err(|e| e.to_string())
}

/// Submit a launch request for the selected crew and topic
pub async fn launch_crew(crew: &[String], topic: &str) -> Result<LaunchData, String> {
    let client = reqwest::Client::new();

    let body = serde_json::json!({
        "crew": crew,
        "topic": topic,
    });

    let response = client
        .post("/api/launch")
        .json(&body)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        let data: serde_json::Value = response.json().await.unwrap_or_default();
        let detail = data["detail"]
            .as_str()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
        return Err(detail);
    }

    response.json::<LaunchData>().await.map_err(|e| e.to_string())
}

/// Poll for the result of a session.
///
/// `Ok(Some(text))` once the result is ready, `Ok(None)` while the backend
/// is still working (404), `Err` on any other status. The caller must stop
/// polling on `Err`.
pub async fn fetch_result(session_id: &str) -> Result<Option<String>, String> {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("/api/result/{}", session_id))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    match response.status().as_u16() {
        200 => {
            let data: serde_json::Value = response.json().await.map_err(|e| e.to_string())?;
            Ok(Some(data["content"].as_str().unwrap_or_default().to_string()))
        }
        404 => Ok(None),
        other => Err(format!("HTTP error! status: {}", other)),
    }
}
