//! Co-occurrence history between ordered component pairs.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

#[derive(Debug, Clone, Copy)]
struct HistoryEntry {
    count: u64,
    last_seen: DateTime<Utc>,
}

/// Concurrent counter of candidate edges seen per `(upstream, downstream)`
/// component pair. Safe to update from many ingestion workers at once.
#[derive(Debug, Default)]
pub struct ComponentHistory {
    entries: DashMap<(String, String), HistoryEntry>,
}

impl ComponentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one candidate for the pair and return the count seen before it.
    pub fn observe(&self, upstream: &str, downstream: &str, at: DateTime<Utc>) -> u64 {
        let mut entry = self
            .entries
            .entry((upstream.to_string(), downstream.to_string()))
            .or_insert(HistoryEntry {
                count: 0,
                last_seen: at,
            });
        let prior = entry.count;
        entry.count = entry.count.saturating_add(1);
        if at > entry.last_seen {
            entry.last_seen = at;
        }
        prior
    }

    /// Current count for the pair without recording anything.
    pub fn count(&self, upstream: &str, downstream: &str) -> u64 {
        self.entries
            .get(&(upstream.to_string(), downstream.to_string()))
            .map_or(0, |e| e.count)
    }

    /// Add `count` prior observations, e.g. when rebuilding from persisted edges.
    pub fn seed(&self, upstream: &str, downstream: &str, count: u64, last_seen: DateTime<Utc>) {
        if count == 0 {
            return;
        }
        let mut entry = self
            .entries
            .entry((upstream.to_string(), downstream.to_string()))
            .or_insert(HistoryEntry {
                count: 0,
                last_seen,
            });
        entry.count = entry.count.saturating_add(count);
        if last_seen > entry.last_seen {
            entry.last_seen = last_seen;
        }
    }

    /// Drop pairs not seen since `cutoff`. Returns the number removed.
    pub fn prune_before(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.last_seen >= cutoff);
        before.saturating_sub(self.entries.len())
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
