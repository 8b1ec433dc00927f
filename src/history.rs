//! Recency history of attached window identifiers.

use std::collections::HashSet;

/// Ordered, duplicate-free recency list, most-recent-last.
///
/// Created empty at process start and never persisted; length is bounded by
/// the number of distinct identifiers ever promoted.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `id` to the most-recent position, inserting it if absent.
    ///
    /// No-op when `id` is already the most-recent entry.
    pub fn promote(&mut self, id: &str) {
        if self.most_recent() == Some(id) {
            return;
        }
        self.entries.retain(|entry| entry != id);
        self.entries.push(id.to_string());
    }

    /// Drop the most-recent entry if it is not among `current_ids`.
    ///
    /// Only the head is checked; older stale entries are left alone and age
    /// out naturally as the list is promoted past them.
    pub fn prune_if_stale(&mut self, current_ids: &HashSet<&str>) {
        if let Some(head) = self.entries.last() {
            if !current_ids.contains(head.as_str()) {
                self.entries.pop();
            }
        }
    }

    pub fn most_recent(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn second_most_recent(&self) -> Option<&str> {
        self.entries
            .len()
            .checked_sub(2)
            .map(|i| self.entries[i].as_str())
    }

    /// Recency rank of `id` counted from the most-recent end: 0 for the most
    /// recent, 1 for the second, and so on.
    pub fn rank(&self, id: &str) -> Option<usize> {
        self.entries
            .iter()
            .rev()
            .position(|entry| entry == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
