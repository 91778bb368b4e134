//! Identity Context
//!
//! "Being authenticated" is a precondition owned by an external identity
//! provider; this module only carries the resulting context. It is passed
//! explicitly into the workflow constructor instead of living in an ambient
//! global, so the workflow stays independently testable.

use serde::{Deserialize, Serialize};

/// Opaque authenticated-user context
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Identity {
    /// Not signed in; browsing only
    #[default]
    Guest,

    /// Signed in via the external identity provider
    User {
        user_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
}

impl Identity {
    /// Signed-in identity with just a user id
    pub fn user(user_id: impl Into<String>) -> Self {
        Identity::User {
            user_id: user_id.into(),
            display_name: None,
            email: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::User { .. })
    }

    /// Name to greet the user with: display name, then email, then "User"
    pub fn greeting_name(&self) -> &str {
        match self {
            Identity::User {
                display_name: Some(name),
                ..
            } => name,
            Identity::User {
                email: Some(email), ..
            } => email,
            _ => "User",
        }
    }
}
