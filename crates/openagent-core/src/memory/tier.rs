//! Capacity-bounded memory tier.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::MemoryError;
use crate::utils::now_utc;

use super::types::{MemoryEntry, Metadata};

/// A bounded, append-only log of entries with FIFO eviction.
///
/// Entries are kept oldest first. After every mutation `len() <= max_items()`.
#[derive(Debug, Clone)]
pub struct MemoryTier {
    name: String,
    max_items: usize,
    ttl_seconds: u64,
    entries: VecDeque<MemoryEntry>,
}

impl MemoryTier {
    /// Create an empty tier.
    ///
    /// Returns [`MemoryError::InvalidCapacity`] when `max_items` is zero.
    pub fn new(
        name: impl Into<String>,
        max_items: usize,
        ttl_seconds: u64,
    ) -> Result<Self, MemoryError> {
        let name = name.into();
        if max_items == 0 {
            return Err(MemoryError::InvalidCapacity {
                tier: name,
                max_items,
            });
        }
        Ok(Self::with_capacity(name, max_items, ttl_seconds))
    }

    /// Caller guarantees `max_items > 0`.
    pub(crate) fn with_capacity(
        name: impl Into<String>,
        max_items: usize,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            name: name.into(),
            max_items,
            ttl_seconds,
            entries: VecDeque::new(),
        }
    }

    /// Append a new entry stamped with the current time.
    ///
    /// Timestamps never go backwards within a tier: if the clock stepped back, the
    /// entry reuses the newest stored timestamp. Non-finite float metadata is stored
    /// as text so every entry survives a snapshot.
    pub fn add(&mut self, content: impl Into<String>, metadata: Option<Metadata>) {
        let mut timestamp = now_utc();
        if let Some(last) = self.entries.back() {
            timestamp = timestamp.max(last.timestamp);
        }
        let metadata = metadata
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, v.into_storable()))
            .collect();
        self.push(MemoryEntry::at(content, metadata, timestamp));
    }

    fn push(&mut self, entry: MemoryEntry) {
        self.entries.push_back(entry);
        let evicted = self.trim_to_capacity();
        if evicted > 0 {
            debug!(tier = %self.name, evicted, "evicted oldest memory entries");
        }
    }

    fn trim_to_capacity(&mut self) -> usize {
        let excess = self.entries.len().saturating_sub(self.max_items);
        self.entries.drain(..excess);
        excess
    }

    /// Replace every entry, keeping only the most recent `max_items`.
    ///
    /// Returns how many of the supplied entries were dropped.
    pub(crate) fn replace_entries(&mut self, entries: Vec<MemoryEntry>) -> usize {
        self.entries = entries.into();
        self.trim_to_capacity()
    }

    /// Render the tier as a prompt block.
    ///
    /// The first line is `[name]`, followed by `- content` for each selected entry in
    /// insertion order. `limit` selects the most recent entries; `Some(0)` selects none.
    /// An empty selection renders as the empty string, header included.
    pub fn render(&self, limit: Option<usize>) -> String {
        self.render_selected(self.entries.iter().collect(), limit)
    }

    /// Like [`render`](Self::render) but skips entries older than the tier's TTL at `now`.
    pub fn render_fresh(&self, limit: Option<usize>, now: DateTime<Utc>) -> String {
        let fresh = self
            .entries
            .iter()
            .filter(|entry| !self.is_expired(entry, now))
            .collect();
        self.render_selected(fresh, limit)
    }

    fn render_selected(&self, selected: Vec<&MemoryEntry>, limit: Option<usize>) -> String {
        let skip = limit.map_or(0, |n| selected.len().saturating_sub(n));
        let selected = &selected[skip..];
        if selected.is_empty() {
            return String::new();
        }

        let mut out = format!("[{}]", self.name);
        for entry in selected {
            out.push_str("\n- ");
            out.push_str(&entry.content);
        }
        out
    }

    /// Whether `entry` is older than this tier's TTL at `now`
    pub fn is_expired(&self, entry: &MemoryEntry, now: DateTime<Utc>) -> bool {
        older_than(entry, self.ttl_seconds, now)
    }

    /// Drop entries older than the TTL. Returns the number removed.
    pub fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl_seconds;
        self.entries.retain(|entry| !older_than(entry, ttl, now));
        before - self.entries.len()
    }

    /// Remove all entries. Idempotent.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored entries, oldest first
    pub fn entries(
        &self,
    ) -> impl DoubleEndedIterator<Item = &MemoryEntry> + ExactSizeIterator + '_ {
        self.entries.iter()
    }
}

fn older_than(entry: &MemoryEntry, ttl_seconds: u64, now: DateTime<Utc>) -> bool {
    let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
    now.signed_duration_since(entry.timestamp).num_seconds() > ttl
}
