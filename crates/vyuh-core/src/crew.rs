//! Crew Selection
//!
//! In-memory set of selected agent ids. Pure client state: no persistence,
//! no network. Insertion order is kept for display; membership is unique.

use serde::{Deserialize, Serialize};

/// Duplicate-free, insertion-ordered set of agent ids
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id if not already selected. Returns true if it was added.
    pub fn add(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Remove an id. Returns true if it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    /// Flip membership of an id. Returns true if the id is now selected.
    ///
    /// Two toggles of the same id restore the selection exactly.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) { false } else { self.add(id) }
    }

    /// Reset to the empty selection
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replace the whole selection, dropping duplicates while keeping order
    pub fn replace(&mut self, ids: impl IntoIterator<Item = String>) {
        self.ids.clear();
        for id in ids {
            self.add(&id);
        }
    }

    /// Whether an id is selected
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Selected ids in insertion order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of selected agents
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_pair_restores_selection() {
        let mut selection = Selection::new();
        selection.add("researcher");
        let before = selection.clone();

        selection.toggle("writer");
        selection.toggle("writer");
        assert_eq!(selection, before);

        // Same law starting from a selected id
        selection.toggle("researcher");
        selection.toggle("researcher");
        assert_eq!(selection, before);
    }

    #[test]
    fn test_no_duplicates() {
        let mut selection = Selection::new();
        assert!(selection.add("writer"));
        assert!(!selection.add("writer"));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_select_a_b_then_remove_a() {
        let mut selection = Selection::new();
        selection.toggle("a");
        selection.toggle("b");
        selection.remove("a");
        assert_eq!(selection.ids(), ["b".to_string()]);
    }

    #[test]
    fn test_replace_drops_duplicates() {
        let mut selection = Selection::new();
        selection.replace(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(selection.ids(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_clear() {
        let mut selection = Selection::new();
        selection.add("a");
        selection.clear();
        assert!(selection.is_empty());
    }
}
