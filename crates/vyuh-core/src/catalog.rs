//! Agent Catalog
//!
//! Read-only agent definitions served by the backend. The catalog is
//! replaced wholesale on every successful fetch; there is no partial state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One agent template from the backend catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Short role title (e.g. "Senior Research Specialist")
    pub role: String,

    /// What the agent is meant to accomplish
    pub goal: String,

    /// Flavor text shown on the agent card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,

    /// Coarse grouping used for filtering (e.g. "researcher", "writer")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Skill tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

/// Catalog mapping agent id to its definition.
///
/// A `BTreeMap` keeps iteration order stable so the grid renders the same
/// way on every load.
pub type AgentCatalog = BTreeMap<String, Agent>;

/// Lifecycle of the catalog fetch
#[derive(Clone, Debug, Default)]
pub enum CatalogState {
    /// No fetch attempted yet
    #[default]
    NotLoaded,

    /// A fetch is outstanding; consumers should show a loading indicator
    Loading,

    /// Catalog available
    Ready(AgentCatalog),

    /// Fetch failed; retry re-runs the same fetch
    Failed(String),
}

impl CatalogState {
    /// Whether a fetch is currently outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self, CatalogState::Loading)
    }

    /// The loaded catalog, if any
    pub fn catalog(&self) -> Option<&AgentCatalog> {
        match self {
            CatalogState::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }

    /// The load error, if the last fetch failed
    pub fn error(&self) -> Option<&str> {
        match self {
            CatalogState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Display name derived from a catalog key ("researcher" -> "Researcher")
pub fn display_name(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
