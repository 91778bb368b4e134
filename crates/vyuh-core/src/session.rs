//! Launch Sessions
//!
//! Wire types for the launch endpoint and the session id correlating a
//! launch to its (possibly delayed) result.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crew::Selection;
use crate::error::{Result, VyuhError};

/// Backend-assigned identifier correlating a launch request to its result
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh id (mocks and tests; the backend assigns real ones)
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload for the launch endpoint.
///
/// Only built through [`LaunchRequest::new`], which enforces the launch
/// preconditions, so an invalid request can never reach the network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRequest {
    /// Selected agent ids, non-empty
    pub crew: Vec<String>,

    /// Trimmed topic text, non-empty
    pub topic: String,
}

impl LaunchRequest {
    /// Validate the launch preconditions and build the request.
    ///
    /// The topic is trimmed before the emptiness check, matching what the
    /// backend receives.
    pub fn new(selection: &Selection, topic: &str) -> Result<Self> {
        if selection.is_empty() {
            return Err(VyuhError::Validation(
                "Please select at least one agent".into(),
            ));
        }

        let trimmed = topic.trim();
        if trimmed.is_empty() {
            return Err(VyuhError::Validation("Please enter a topic".into()));
        }

        Ok(Self {
            crew: selection.ids().to_vec(),
            topic: trimmed.to_string(),
        })
    }
}

/// Response from the launch endpoint.
///
/// `data` carries the result text when the backend executed synchronously;
/// when it is absent the caller polls the result endpoint with `session_id`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LaunchResponse {
    pub session_id: SessionId,

    /// Topic echoed back by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Crew echoed back by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew: Option<Vec<String>>,

    /// Inline result text (synchronous execution)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}
