//! Mock Crew API
//!
//! For testing and demo purposes. Serves a small static catalog, answers
//! launches with canned responses, and plays back a scripted sequence of
//! poll outcomes. Every endpoint counts its calls so tests can assert on
//! network behavior.

use std::collections::VecDeque;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{CrewApi, PollStatus};
use crate::catalog::{Agent, AgentCatalog};
use crate::error::{Result, VyuhError};
use crate::session::{LaunchRequest, LaunchResponse, SessionId};

/// One scripted answer from the result endpoint
#[derive(Clone, Debug)]
pub enum ScriptedPoll {
    /// Result not ready yet (the 404 case)
    Pending,

    /// Result ready with this text
    Ready(String),

    /// Terminal poll failure (non-200/404 status or transport error)
    Fail(String),
}

/// Mock crew backend with a static catalog and scripted responses
pub struct MockCrewApi {
    catalog: RwLock<AgentCatalog>,
    catalog_failure: RwLock<Option<String>>,
    launch_response: RwLock<Option<LaunchResponse>>,
    launch_failure: RwLock<Option<String>>,
    launch_delay: RwLock<Duration>,
    polls: RwLock<VecDeque<ScriptedPoll>>,
    fetch_agents_calls: AtomicUsize,
    launch_calls: AtomicUsize,
    poll_calls: AtomicUsize,
}

impl Default for MockCrewApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCrewApi {
    pub fn new() -> Self {
        Self {
            catalog: RwLock::new(sample_catalog()),
            catalog_failure: RwLock::new(None),
            launch_response: RwLock::new(None),
            launch_failure: RwLock::new(None),
            launch_delay: RwLock::new(Duration::ZERO),
            polls: RwLock::new(VecDeque::new()),
            fetch_agents_calls: AtomicUsize::new(0),
            launch_calls: AtomicUsize::new(0),
            poll_calls: AtomicUsize::new(0),
        }
    }

    /// Replace the served catalog
    pub fn with_catalog(self, catalog: AgentCatalog) -> Self {
        *self.catalog.write().unwrap() = catalog;
        self
    }

    /// Make catalog fetches fail with this message
    pub fn with_catalog_failure(self, message: impl Into<String>) -> Self {
        *self.catalog_failure.write().unwrap() = Some(message.into());
        self
    }

    /// Fixed response for every launch
    pub fn with_launch_response(self, response: LaunchResponse) -> Self {
        *self.launch_response.write().unwrap() = Some(response);
        self
    }

    /// Make launches fail with this detail message
    pub fn with_launch_failure(self, detail: impl Into<String>) -> Self {
        *self.launch_failure.write().unwrap() = Some(detail.into());
        self
    }

    /// Delay each launch response (for in-flight tests)
    pub fn with_launch_delay(self, delay: Duration) -> Self {
        *self.launch_delay.write().unwrap() = delay;
        self
    }

    /// Script the result endpoint. Once the script runs out, further polls
    /// answer `Pending`.
    pub fn with_polls(self, polls: impl IntoIterator<Item = ScriptedPoll>) -> Self {
        *self.polls.write().unwrap() = polls.into_iter().collect();
        self
    }

    /// Clear a previously configured catalog failure
    pub fn heal_catalog(&self) {
        *self.catalog_failure.write().unwrap() = None;
    }

    pub fn fetch_agents_calls(&self) -> usize {
        self.fetch_agents_calls.load(Ordering::SeqCst)
    }

    pub fn launch_calls(&self) -> usize {
        self.launch_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CrewApi for MockCrewApi {
    async fn fetch_agents(&self) -> Result<AgentCatalog> {
        self.fetch_agents_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.catalog_failure.read().unwrap().clone() {
            return Err(VyuhError::CatalogLoad(message));
        }

        Ok(self.catalog.read().unwrap().clone())
    }

    async fn launch(&self, request: &LaunchRequest) -> Result<LaunchResponse> {
        self.launch_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.launch_delay.read().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(detail) = self.launch_failure.read().unwrap().clone() {
            return Err(VyuhError::Launch {
                status: Some(500),
                detail,
            });
        }

        if let Some(response) = self.launch_response.read().unwrap().clone() {
            return Ok(response);
        }

        // Default: synchronous execution with canned text
        Ok(LaunchResponse {
            session_id: SessionId::new(),
            topic: Some(request.topic.clone()),
            crew: Some(request.crew.clone()),
            data: Some(format!(
                "[mock] {} agent(s) completed work on \"{}\"",
                request.crew.len(),
                request.topic
            )),
        })
    }

    async fn fetch_result(&self, _session: &SessionId) -> Result<PollStatus> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);

        match self.polls.write().unwrap().pop_front() {
            None | Some(ScriptedPoll::Pending) => Ok(PollStatus::Pending),
            Some(ScriptedPoll::Ready(text)) => Ok(PollStatus::Ready(text)),
            Some(ScriptedPoll::Fail(message)) => Err(VyuhError::Poll(message)),
        }
    }
}

/// Small static catalog in the shape the backend serves
fn sample_catalog() -> AgentCatalog {
    let mut catalog = AgentCatalog::new();
    catalog.insert(
        "researcher".into(),
        Agent {
            role: "Senior Research Specialist".into(),
            goal: "Uncover current developments on the given topic".into(),
            backstory: Some("A meticulous analyst known for finding the sources everyone else misses.".into()),
            category: Some("researcher".into()),
            skills: vec!["web research".into(), "summarization".into()],
        },
    );
    catalog.insert(
        "writer".into(),
        Agent {
            role: "Content Writer".into(),
            goal: "Turn research notes into compelling long-form text".into(),
            backstory: Some("A former journalist with a knack for narrative structure.".into()),
            category: Some("writer".into()),
            skills: vec!["copywriting".into()],
        },
    );
    catalog.insert(
        "analyst".into(),
        Agent {
            role: "Data Analyst".into(),
            goal: "Interpret data and surface actionable insights".into(),
            backstory: None,
            category: Some("analyst".into()),
            skills: Vec::new(),
        },
    );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crew::Selection;

    #[tokio::test]
    async fn test_mock_serves_catalog() {
        let api = MockCrewApi::new();
        let catalog = api.fetch_agents().await.unwrap();
        assert!(catalog.contains_key("researcher"));
        assert_eq!(api.fetch_agents_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_default_launch_is_synchronous() {
        let api = MockCrewApi::new();
        let mut selection = Selection::new();
        selection.add("writer");
        let request = LaunchRequest::new(&selection, "test topic").unwrap();

        let response = api.launch(&request).await.unwrap();
        assert!(response.data.is_some());
        assert_eq!(api.launch_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_poll_script_plays_in_order() {
        let api = MockCrewApi::new().with_polls([
            ScriptedPoll::Pending,
            ScriptedPoll::Ready("done".into()),
        ]);
        let session = SessionId::from_string("s1");

        assert_eq!(api.fetch_result(&session).await.unwrap(), PollStatus::Pending);
        assert_eq!(
            api.fetch_result(&session).await.unwrap(),
            PollStatus::Ready("done".into())
        );
        // Script exhausted: stays pending
        assert_eq!(api.fetch_result(&session).await.unwrap(), PollStatus::Pending);
    }
}
