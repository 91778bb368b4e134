//! Saved Crews
//!
//! Named crew compositions a user can store and re-apply. Persistence is
//! delegated to an external document store; this module owns only the seam
//! and an in-memory stand-in for development and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// A named, reusable crew composition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewPreset {
    /// Unique identifier
    pub id: String,

    /// User-chosen name
    pub name: String,

    /// Agent ids in display order
    pub agent_ids: Vec<String>,

    /// Owning user id
    pub owner: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl CrewPreset {
    /// Create a new preset owned by `owner`
    pub fn new(
        name: impl Into<String>,
        agent_ids: Vec<String>,
        owner: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            agent_ids,
            owner: owner.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Preset store trait for persistence
pub trait PresetStore: Send + Sync {
    /// Save (insert or replace) a preset
    fn save(&self, preset: &CrewPreset) -> Result<()>;

    /// Load a preset by id
    fn get(&self, id: &str) -> Result<Option<CrewPreset>>;

    /// Delete a preset
    fn delete(&self, id: &str) -> Result<()>;

    /// List presets owned by a user, newest first
    fn list_for_user(&self, owner: &str) -> Result<Vec<CrewPreset>>;
}

/// In-memory preset store (for development/testing)
pub struct MemoryPresetStore {
    presets: RwLock<HashMap<String, CrewPreset>>,
}

impl Default for MemoryPresetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPresetStore {
    pub fn new() -> Self {
        Self {
            presets: RwLock::new(HashMap::new()),
        }
    }
}

impl PresetStore for MemoryPresetStore {
    fn save(&self, preset: &CrewPreset) -> Result<()> {
        let mut presets = self.presets.write().unwrap();
        presets.insert(preset.id.clone(), preset.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<CrewPreset>> {
        let presets = self.presets.read().unwrap();
        Ok(presets.get(id).cloned())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut presets = self.presets.write().unwrap();
        presets.remove(id);
        Ok(())
    }

    fn list_for_user(&self, owner: &str) -> Result<Vec<CrewPreset>> {
        let presets = self.presets.read().unwrap();
        let mut result: Vec<_> = presets
            .values()
            .filter(|p| p.owner == owner)
            .cloned()
            .collect();

        // Sort by created_at descending
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryPresetStore::new();
        let preset = CrewPreset::new("content team", vec!["researcher".into()], "u1");
        let id = preset.id.clone();

        store.save(&preset).unwrap();

        let loaded = store.get(&id).unwrap();
        assert_eq!(loaded, Some(preset));

        store.delete(&id).unwrap();
        assert!(store.get(&id).unwrap().is_none());
    }

    #[test]
    fn test_list_filters_by_owner() {
        let store = MemoryPresetStore::new();
        store
            .save(&CrewPreset::new("mine", vec!["a".into()], "u1"))
            .unwrap();
        store
            .save(&CrewPreset::new("theirs", vec!["b".into()], "u2"))
            .unwrap();

        let mine = store.list_for_user("u1").unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "mine");
    }
}
