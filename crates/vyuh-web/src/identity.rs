//! Identity Context
//!
//! Login itself is owned by an external identity provider; its widget
//! leaves a profile in local storage and this module only reads it back.
//! Everything downstream treats the result as an opaque signed-in/guest
//! flag plus display fields.

use serde::{Deserialize, Serialize};

const PROFILE_STORAGE_KEY: &str = "vyuh_user";

/// Signed-in user profile, or guest
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    /// Read the stored profile, falling back to guest
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|storage| storage.get_item(PROFILE_STORAGE_KEY).ok().flatten());

        stored
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Name to greet the user with: display name, then email, then "User"
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("User")
    }
}
