//! Crew Launch Workflow
//!
//! The client-side state machine behind the crew builder: tracks which
//! agents are selected, validates launch preconditions, submits the launch,
//! and follows the result either inline or through fixed-interval polling.
//!
//! All state is local to one workflow instance. The poller is cancellable
//! on every exit path (resolution, reset, teardown) so no poll can fire
//! against a consumer that is gone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::sync::watch;

use crate::api::{CrewApi, PollStatus};
use crate::catalog::CatalogState;
use crate::crew::Selection;
use crate::error::{Result, VyuhError};
use crate::identity::Identity;
use crate::preset::CrewPreset;
use crate::session::{LaunchRequest, SessionId};

/// Workflow tuning
#[derive(Clone, Debug)]
pub struct WorkflowConfig {
    /// Fixed delay between result polls
    pub poll_interval: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
        }
    }
}

/// Observable phase of the workflow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WorkflowPhase {
    /// Nothing submitted; selection and topic are editable
    #[default]
    Idle,

    /// Launch request in flight
    Launching,

    /// Launch accepted without inline data; awaiting the polled result
    Polling,

    /// Result text available
    Ready,

    /// Polling hit a terminal failure; only reset leaves this phase
    Abandoned,
}

/// Outcome of a launch call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Backend executed synchronously; the result text is available now
    Ready(String),

    /// Backend deferred execution; follow up with `wait_for_result`
    Deferred(SessionId),
}

/// How a polling run ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollEnd {
    /// Result text arrived
    Resolved(String),

    /// Polling was cancelled by reset or teardown
    Cancelled,
}

#[derive(Debug, Default)]
struct WorkflowState {
    phase: WorkflowPhase,
    catalog: CatalogState,
    selection: Selection,
    topic: String,
    session: Option<SessionId>,
    result_text: Option<String>,
    last_error: Option<String>,
}

/// Clears the in-flight flag on every exit path, including early returns
/// and panics.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The crew-selection and launch-session workflow
pub struct CrewWorkflow {
    api: Arc<dyn CrewApi>,
    identity: Identity,
    config: WorkflowConfig,
    state: RwLock<WorkflowState>,
    launch_in_flight: AtomicBool,
    poll_cancel: Mutex<Option<watch::Sender<bool>>>,
}

impl CrewWorkflow {
    /// Create a workflow bound to a backend and an identity context
    pub fn new(api: Arc<dyn CrewApi>, identity: Identity) -> Self {
        Self::with_config(api, identity, WorkflowConfig::default())
    }

    /// Create with custom tuning (shorter poll intervals in tests)
    pub fn with_config(api: Arc<dyn CrewApi>, identity: Identity, config: WorkflowConfig) -> Self {
        Self {
            api,
            identity,
            config,
            state: RwLock::new(WorkflowState::default()),
            launch_in_flight: AtomicBool::new(false),
            poll_cancel: Mutex::new(None),
        }
    }

    // ------------------------------------------------------------------
    // Catalog loader
    // ------------------------------------------------------------------

    /// Fetch the agent catalog.
    ///
    /// At most one request is outstanding at a time; a call while loading
    /// is a no-op. Success replaces the whole catalog, failure keeps no
    /// partial data, and retry is just calling this again.
    pub async fn load_catalog(&self) -> Result<()> {
        {
            let mut state = self.state.write().unwrap();
            if state.catalog.is_loading() {
                tracing::debug!("catalog fetch already outstanding");
                return Ok(());
            }
            state.catalog = CatalogState::Loading;
        }

        match self.api.fetch_agents().await {
            Ok(catalog) => {
                tracing::debug!(agents = catalog.len(), "catalog loaded");
                self.state.write().unwrap().catalog = CatalogState::Ready(catalog);
                Ok(())
            }
            Err(e) => {
                let message = e.user_message();
                self.state.write().unwrap().catalog = CatalogState::Failed(message);
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Selection store
    // ------------------------------------------------------------------

    /// Flip membership of an agent id. Returns true if it is now selected.
    pub fn toggle(&self, id: &str) -> bool {
        self.state.write().unwrap().selection.toggle(id)
    }

    /// Empty the selection without touching the rest of the workflow
    pub fn clear_selection(&self) {
        self.state.write().unwrap().selection.clear();
    }

    /// Replace the selection with a saved crew
    pub fn apply_preset(&self, preset: &CrewPreset) {
        self.state
            .write()
            .unwrap()
            .selection
            .replace(preset.agent_ids.iter().cloned());
    }

    pub fn set_topic(&self, topic: impl Into<String>) {
        self.state.write().unwrap().topic = topic.into();
    }

    // ------------------------------------------------------------------
    // Launch controller
    // ------------------------------------------------------------------

    /// Whether the launch control should be enabled
    pub fn can_launch(&self) -> bool {
        if self.launch_in_flight() || !self.identity.is_authenticated() {
            return false;
        }
        let state = self.state.read().unwrap();
        !state.selection.is_empty() && !state.topic.trim().is_empty()
    }

    pub fn launch_in_flight(&self) -> bool {
        self.launch_in_flight.load(Ordering::SeqCst)
    }

    /// Submit the current selection and topic.
    ///
    /// Preconditions are checked before any network call: an authenticated
    /// identity, a non-empty selection, and a non-blank topic. Only one
    /// launch may be in flight per workflow; the flag is released on every
    /// exit path.
    pub async fn launch(&self) -> Result<LaunchOutcome> {
        if !self.identity.is_authenticated() {
            return Err(VyuhError::Auth("launching requires a signed-in user".into()));
        }

        let request = {
            let state = self.state.read().unwrap();
            LaunchRequest::new(&state.selection, &state.topic)?
        };

        if self
            .launch_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(VyuhError::LaunchInFlight);
        }
        let _guard = InFlightGuard(&self.launch_in_flight);

        {
            let mut state = self.state.write().unwrap();
            state.phase = WorkflowPhase::Launching;
            state.last_error = None;
        }

        tracing::debug!(crew = ?request.crew, topic = %request.topic, "launching crew");

        match self.api.launch(&request).await {
            Ok(response) => {
                let mut state = self.state.write().unwrap();
                state.session = Some(response.session_id.clone());
                match response.data {
                    Some(text) => {
                        state.result_text = Some(text.clone());
                        state.phase = WorkflowPhase::Ready;
                        Ok(LaunchOutcome::Ready(text))
                    }
                    None => {
                        state.phase = WorkflowPhase::Polling;
                        Ok(LaunchOutcome::Deferred(response.session_id))
                    }
                }
            }
            Err(e) => {
                let mut state = self.state.write().unwrap();
                state.phase = WorkflowPhase::Idle;
                state.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Result poller
    // ------------------------------------------------------------------

    /// Poll the result endpoint until the session resolves.
    ///
    /// One request per fixed interval. A pending answer keeps polling; any
    /// terminal failure abandons immediately with no automatic recovery.
    /// `reset` cancels the loop from another task; an in-flight request may
    /// finish, but no further poll is issued after cancellation.
    pub async fn wait_for_result(&self) -> Result<PollEnd> {
        let session = {
            let state = self.state.read().unwrap();
            match state.phase {
                WorkflowPhase::Ready => {
                    return Ok(PollEnd::Resolved(
                        state.result_text.clone().unwrap_or_default(),
                    ));
                }
                WorkflowPhase::Polling => state
                    .session
                    .clone()
                    .ok_or_else(|| VyuhError::Other("polling without a session".into()))?,
                _ => return Err(VyuhError::Other("no launch awaiting a result".into())),
            }
        };

        let (cancel_tx, cancel_rx) = watch::channel(false);
        *self.poll_cancel.lock().unwrap() = Some(cancel_tx);

        let outcome = self.poll_loop(&session, cancel_rx).await;
        *self.poll_cancel.lock().unwrap() = None;

        match outcome {
            Ok(PollEnd::Resolved(text)) => {
                let mut state = self.state.write().unwrap();
                state.result_text = Some(text.clone());
                state.phase = WorkflowPhase::Ready;
                Ok(PollEnd::Resolved(text))
            }
            Ok(PollEnd::Cancelled) => {
                // reset() already moved the workflow back to Idle
                Ok(PollEnd::Cancelled)
            }
            Err(e) => {
                tracing::warn!(session = %session, error = %e, "abandoning result polling");
                let mut state = self.state.write().unwrap();
                state.phase = WorkflowPhase::Abandoned;
                state.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    async fn poll_loop(
        &self,
        session: &SessionId,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<PollEnd> {
        loop {
            tokio::select! {
                biased;

                _ = cancel.changed() => {
                    tracing::debug!(session = %session, "polling cancelled");
                    return Ok(PollEnd::Cancelled);
                }

                () = tokio::time::sleep(self.config.poll_interval) => {
                    match self.api.fetch_result(session).await {
                        Ok(PollStatus::Ready(text)) => return Ok(PollEnd::Resolved(text)),
                        // Not produced yet; try again next interval
                        Ok(PollStatus::Pending) => {}
                        Err(e) => return Err(e),
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------

    /// Cancel any active polling and return to an empty idle workflow.
    ///
    /// The loaded catalog is kept; reset starts the workflow over, it does
    /// not reload the world.
    pub fn reset(&self) {
        if let Some(cancel) = self.poll_cancel.lock().unwrap().take() {
            let _ = cancel.send(true);
        }

        let mut state = self.state.write().unwrap();
        state.selection.clear();
        state.topic.clear();
        state.session = None;
        state.result_text = None;
        state.last_error = None;
        state.phase = WorkflowPhase::Idle;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn phase(&self) -> WorkflowPhase {
        self.state.read().unwrap().phase
    }

    pub fn catalog(&self) -> CatalogState {
        self.state.read().unwrap().catalog.clone()
    }

    pub fn selection(&self) -> Selection {
        self.state.read().unwrap().selection.clone()
    }

    pub fn topic(&self) -> String {
        self.state.read().unwrap().topic.clone()
    }

    pub fn session(&self) -> Option<SessionId> {
        self.state.read().unwrap().session.clone()
    }

    pub fn result_text(&self) -> Option<String> {
        self.state.read().unwrap().result_text.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.read().unwrap().last_error.clone()
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockCrewApi, ScriptedPoll};
    use crate::session::LaunchResponse;

    fn fast_config() -> WorkflowConfig {
        WorkflowConfig {
            poll_interval: Duration::from_millis(10),
        }
    }

    fn workflow_with(api: MockCrewApi) -> (Arc<CrewWorkflow>, Arc<MockCrewApi>) {
        let api = Arc::new(api);
        let workflow = Arc::new(CrewWorkflow::with_config(
            api.clone(),
            Identity::user("u1"),
            fast_config(),
        ));
        (workflow, api)
    }

    fn select_crew(workflow: &CrewWorkflow) {
        workflow.toggle("researcher");
        workflow.set_topic("the future of content creation");
    }

    #[tokio::test]
    async fn test_inline_data_reaches_ready_without_polling() {
        let response = LaunchResponse {
            session_id: SessionId::from_string("s1"),
            topic: None,
            crew: None,
            data: Some("hello".into()),
        };
        let (workflow, api) = workflow_with(MockCrewApi::new().with_launch_response(response));
        select_crew(&workflow);

        let outcome = workflow.launch().await.unwrap();
        assert_eq!(outcome, LaunchOutcome::Ready("hello".into()));
        assert_eq!(workflow.phase(), WorkflowPhase::Ready);
        assert_eq!(workflow.result_text(), Some("hello".into()));
        assert_eq!(api.poll_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_selection_blocks_launch_without_network() {
        let (workflow, api) = workflow_with(MockCrewApi::new());
        workflow.set_topic("a topic");

        let result = workflow.launch().await;
        assert!(matches!(result, Err(VyuhError::Validation(_))));
        assert_eq!(api.launch_calls(), 0);
        assert_eq!(workflow.phase(), WorkflowPhase::Idle);
    }

    #[tokio::test]
    async fn test_blank_topic_blocks_launch_without_network() {
        let (workflow, api) = workflow_with(MockCrewApi::new());
        workflow.toggle("researcher");
        workflow.set_topic("   ");

        let result = workflow.launch().await;
        assert!(matches!(result, Err(VyuhError::Validation(_))));
        assert_eq!(api.launch_calls(), 0);
    }

    #[tokio::test]
    async fn test_guest_cannot_launch() {
        let api = Arc::new(MockCrewApi::new());
        let workflow = CrewWorkflow::with_config(api.clone(), Identity::Guest, fast_config());
        select_crew(&workflow);

        let result = workflow.launch().await;
        assert!(matches!(result, Err(VyuhError::Auth(_))));
        assert_eq!(api.launch_calls(), 0);
    }

    #[tokio::test]
    async fn test_deferred_launch_polls_until_resolved() {
        let response = LaunchResponse {
            session_id: SessionId::from_string("s2"),
            topic: None,
            crew: None,
            data: None,
        };
        let api = MockCrewApi::new()
            .with_launch_response(response)
            .with_polls([ScriptedPoll::Pending, ScriptedPoll::Ready("done".into())]);
        let (workflow, api) = workflow_with(api);
        select_crew(&workflow);

        let outcome = workflow.launch().await.unwrap();
        assert_eq!(
            outcome,
            LaunchOutcome::Deferred(SessionId::from_string("s2"))
        );
        assert_eq!(workflow.phase(), WorkflowPhase::Polling);

        let end = workflow.wait_for_result().await.unwrap();
        assert_eq!(end, PollEnd::Resolved("done".into()));
        assert_eq!(workflow.phase(), WorkflowPhase::Ready);
        assert_eq!(workflow.result_text(), Some("done".into()));
        assert_eq!(api.poll_calls(), 2);
    }

    #[tokio::test]
    async fn test_poll_failure_abandons_immediately() {
        let response = LaunchResponse {
            session_id: SessionId::from_string("s3"),
            topic: None,
            crew: None,
            data: None,
        };
        let api = MockCrewApi::new().with_launch_response(response).with_polls([
            ScriptedPoll::Pending,
            ScriptedPoll::Fail("HTTP status 500".into()),
        ]);
        let (workflow, api) = workflow_with(api);
        select_crew(&workflow);

        workflow.launch().await.unwrap();
        let result = workflow.wait_for_result().await;
        assert!(matches!(result, Err(VyuhError::Poll(_))));
        assert_eq!(workflow.phase(), WorkflowPhase::Abandoned);
        assert_eq!(api.poll_calls(), 2);

        // The loop has returned; no timer keeps firing behind our back
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(api.poll_calls(), 2);
    }

    #[tokio::test]
    async fn test_reset_during_polling_stops_subsequent_polls() {
        let response = LaunchResponse {
            session_id: SessionId::from_string("s4"),
            topic: None,
            crew: None,
            data: None,
        };
        // Empty script: the result endpoint answers pending forever
        let (workflow, api) = workflow_with(MockCrewApi::new().with_launch_response(response));
        select_crew(&workflow);
        workflow.launch().await.unwrap();

        let poller = {
            let workflow = workflow.clone();
            tokio::spawn(async move { workflow.wait_for_result().await })
        };

        tokio::time::sleep(Duration::from_millis(35)).await;
        workflow.reset();

        let end = poller.await.unwrap().unwrap();
        assert_eq!(end, PollEnd::Cancelled);
        assert_eq!(workflow.phase(), WorkflowPhase::Idle);
        assert!(workflow.selection().is_empty());

        let after_reset = api.poll_calls();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(api.poll_calls(), after_reset);
    }

    #[tokio::test]
    async fn test_second_launch_rejected_while_in_flight() {
        let api = MockCrewApi::new().with_launch_delay(Duration::from_millis(50));
        let (workflow, api) = workflow_with(api);
        select_crew(&workflow);

        let first = {
            let workflow = workflow.clone();
            tokio::spawn(async move { workflow.launch().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let second = workflow.launch().await;
        assert!(matches!(second, Err(VyuhError::LaunchInFlight)));

        first.await.unwrap().unwrap();
        assert_eq!(api.launch_calls(), 1);
        assert!(!workflow.launch_in_flight());
    }

    #[tokio::test]
    async fn test_launch_failure_returns_to_idle_and_releases_flag() {
        let (workflow, api) =
            workflow_with(MockCrewApi::new().with_launch_failure("model quota exceeded"));
        select_crew(&workflow);

        let result = workflow.launch().await;
        assert!(matches!(result, Err(VyuhError::Launch { .. })));
        assert_eq!(workflow.phase(), WorkflowPhase::Idle);
        assert!(workflow.last_error().is_some());
        assert!(!workflow.launch_in_flight());
        assert_eq!(api.launch_calls(), 1);
    }

    #[tokio::test]
    async fn test_catalog_failure_is_retryable() {
        let (workflow, api) =
            workflow_with(MockCrewApi::new().with_catalog_failure("connection refused"));

        let result = workflow.load_catalog().await;
        assert!(matches!(result, Err(VyuhError::CatalogLoad(_))));
        assert!(workflow.catalog().error().is_some());

        api.heal_catalog();
        workflow.load_catalog().await.unwrap();
        assert!(workflow.catalog().catalog().is_some());
        assert_eq!(api.fetch_agents_calls(), 2);
    }

    #[tokio::test]
    async fn test_apply_preset_replaces_selection() {
        let (workflow, _api) = workflow_with(MockCrewApi::new());
        workflow.toggle("analyst");

        let preset = CrewPreset::new(
            "content team",
            vec!["researcher".into(), "writer".into()],
            "u1",
        );
        workflow.apply_preset(&preset);

        assert_eq!(
            workflow.selection().ids(),
            ["researcher".to_string(), "writer".to_string()]
        );
    }

    #[tokio::test]
    async fn test_can_launch_tracks_preconditions() {
        let (workflow, _api) = workflow_with(MockCrewApi::new());
        assert!(!workflow.can_launch());

        workflow.toggle("researcher");
        assert!(!workflow.can_launch());

        workflow.set_topic("  topic  ");
        assert!(workflow.can_launch());

        workflow.set_topic("   ");
        assert!(!workflow.can_launch());
    }
}
