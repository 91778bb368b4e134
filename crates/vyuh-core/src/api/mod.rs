//! Backend API Seam
//!
//! Abstraction over the external crew-execution service.

mod mock;

pub use mock::{MockCrewApi, ScriptedPoll};

use async_trait::async_trait;

use crate::catalog::AgentCatalog;
use crate::error::Result;
use crate::session::{LaunchRequest, LaunchResponse, SessionId};

/// Outcome of one result poll
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollStatus {
    /// Result produced; carries the result text
    Ready(String),

    /// Result not yet produced (a 404 from the result endpoint); poll again
    Pending,
}

/// Crew backend trait (Strategy pattern)
///
/// Implemented over HTTP by `vyuh-client` and by [`MockCrewApi`] for tests
/// and demos. The workflow works exclusively through this interface.
#[async_trait]
pub trait CrewApi: Send + Sync {
    /// Fetch the complete agent catalog
    async fn fetch_agents(&self) -> Result<AgentCatalog>;

    /// Submit a validated launch request
    async fn launch(&self, request: &LaunchRequest) -> Result<LaunchResponse>;

    /// Poll for the result of a launched session
    async fn fetch_result(&self, session: &SessionId) -> Result<PollStatus>;
}
