//! # vyuh-core
//!
//! Client-side core of the Vyuh crew builder: catalog loading, crew
//! selection, launch submission, and result polling.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     CrewWorkflow                             │
//! │  ┌───────────┐  ┌───────────┐  ┌──────────┐  ┌────────────┐  │
//! │  │  Catalog  │  │ Selection │  │  Launch  │  │   Result   │  │
//! │  │  Loader   │──│   Store   │──│ Control  │──│   Poller   │  │
//! │  └───────────┘  └───────────┘  └──────────┘  └────────────┘  │
//! │                        │                                     │
//! │                  CrewApi (Strategy)                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `CrewApi` trait enables swapping the HTTP backend for a scripted
//! mock without changing workflow logic. Front-ends (web, terminal) stay
//! pure views over the workflow state.

pub mod api;
pub mod catalog;
pub mod crew;
pub mod error;
pub mod identity;
pub mod preset;
pub mod session;
pub mod workflow;

pub use api::{CrewApi, MockCrewApi, PollStatus, ScriptedPoll};
pub use catalog::{Agent, AgentCatalog, CatalogState, display_name};
pub use crew::Selection;
pub use error::{Result, VyuhError};
pub use identity::Identity;
pub use preset::{CrewPreset, MemoryPresetStore, PresetStore};
pub use session::{LaunchRequest, LaunchResponse, SessionId};
pub use workflow::{CrewWorkflow, LaunchOutcome, PollEnd, WorkflowConfig, WorkflowPhase};
