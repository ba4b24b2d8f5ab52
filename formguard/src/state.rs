//! Per-field validity tracking.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    valid: bool,
    initial: bool,
}

/// Validity of every field and group on the form.
///
/// Only the [`Orchestrator`](crate::Orchestrator) mutates this; everything
/// else gets a shared reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationState {
    entries: HashMap<String, Entry>,
}

impl ValidationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an id with its initial validity.
    pub(crate) fn track(&mut self, id: impl Into<String>, initial: bool) {
        self.entries.insert(
            id.into(),
            Entry {
                valid: initial,
                initial,
            },
        );
    }

    /// Update a tracked id. Untracked ids are left alone; returns whether the
    /// id was tracked.
    pub(crate) fn set(&mut self, id: &str, valid: bool) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.valid = valid;
                true
            }
            None => false,
        }
    }

    /// Restore every entry to its initial validity.
    pub(crate) fn reset(&mut self) {
        for entry in self.entries.values_mut() {
            entry.valid = entry.initial;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, id: &str) -> Option<bool> {
        self.entries.get(id).map(|entry| entry.valid)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// True iff every tracked entry is valid.
    pub fn all_valid(&self) -> bool {
        self.entries.values().all(|entry| entry.valid)
    }

    /// Ids currently invalid, in no particular order.
    pub fn invalid(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.valid)
            .map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
