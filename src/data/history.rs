//! Bounded per-monitor history of check results.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::model::StatusEntry;

/// Default number of history entries kept per monitor.
pub const DEFAULT_HISTORY_LIMIT: usize = 180;

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// Append-only, capacity-bounded, time-ordered sequence of check results.
///
/// The buffer holds the newest `limit` entries; when an append would exceed
/// the limit, the oldest entries are discarded first. Entries are accepted as
/// opaque data — a negative timestamp or out-of-order entry is stored, not
/// rejected (validation is the producer's job).
///
/// Serializes transparently as the entry sequence; the limit is local
/// configuration, not wire data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryBuffer {
    entries: VecDeque<StatusEntry>,
    #[serde(skip, default = "default_history_limit")]
    limit: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl HistoryBuffer {
    /// Create an empty buffer holding at most `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    /// Append one entry, evicting from the front if the buffer is full.
    pub fn append(&mut self, entry: StatusEntry) {
        self.entries.push_back(entry);
        self.truncate_front();
    }

    /// Replace the entire contents with `entries`, then enforce the bound.
    ///
    /// Used when a full monitor object arrives from the backend — the backend
    /// owns the history, so the buffer is replaced wholesale rather than
    /// reconciled entry by entry.
    pub fn replace_all(&mut self, entries: Vec<StatusEntry>) {
        self.entries = entries.into();
        self.truncate_front();
    }

    /// Change the capacity, discarding oldest entries if already over it.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.truncate_front();
    }

    fn truncate_front(&mut self) {
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    /// Maximum number of entries kept.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The newest entry, if any.
    pub fn latest(&self) -> Option<&StatusEntry> {
        self.entries.back()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a HistoryBuffer {
    type Item = &'a StatusEntry;
    type IntoIter = std::collections::vec_deque::Iter<'a, StatusEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<StatusEntry> for HistoryBuffer {
    fn from_iter<T: IntoIterator<Item = StatusEntry>>(iter: T) -> Self {
        let mut buffer = Self::default();
        buffer.replace_all(iter.into_iter().collect());
        buffer
    }
}
