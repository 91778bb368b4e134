//! Error Types

use thiserror::Error;

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, VyuhError>;

/// Workflow error types
#[derive(Error, Debug)]
pub enum VyuhError {
    /// Catalog fetch failed (recoverable via retry)
    #[error("Catalog load error: {0}")]
    CatalogLoad(String),

    /// Launch preconditions not met; no network call was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Launch rejected by the backend or failed in transit
    #[error("Launch error: {detail}")]
    Launch {
        /// HTTP status, if the request reached the backend
        status: Option<u16>,
        /// Human-readable message from the error body, or the raw status
        detail: String,
    },

    /// A launch is already in flight for this workflow
    #[error("A launch is already in flight")]
    LaunchInFlight,

    /// Result polling hit a terminal failure (non-200/404 or transport)
    #[error("Poll error: {0}")]
    Poll(String),

    /// Operation requires an authenticated identity
    #[error("Authentication required: {0}")]
    Auth(String),

    /// Preset store error
    #[error("Preset error: {0}")]
    Preset(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl VyuhError {
    /// Check if error is recoverable by retrying the same operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, VyuhError::CatalogLoad(_))
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            VyuhError::CatalogLoad(_) => {
                "Could not load the agent catalog. Please retry.".into()
            }
            VyuhError::Validation(msg) => msg.clone(),
            VyuhError::Launch { detail, .. } => format!("Error launching crew: {}", detail),
            VyuhError::LaunchInFlight => "A crew is already being launched.".into(),
            VyuhError::Poll(_) => {
                "The crew result could not be retrieved. Please start over.".into()
            }
            VyuhError::Auth(_) => "Please sign in to launch a crew.".into(),
            VyuhError::Preset(msg) => format!("Saved crew error: {}", msg),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for VyuhError {
    fn from(err: anyhow::Error) -> Self {
        VyuhError::Other(err.to_string())
    }
}
