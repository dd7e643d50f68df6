//! Offset Table: the single source of truth for how many events have been seen.
//! All mutation goes through `record_event`; readers get sorted owned copies.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Per-topic counters. `end_offset` only ever increments and the topic entry
/// is never deleted, so any two snapshots are monotonic per topic.
///
/// Offsets are tracked per-topic, not per-partition: every partition of a
/// topic reports the same end offset. Dashboards depend on this aggregate
/// semantic, so it is kept rather than fixed.
#[derive(Debug, Default)]
pub struct TopicState {
    pub end_offset: u64,
    pub partitions: BTreeSet<i64>,
}

/// Read-only copy of one topic's state, partitions sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicView {
    pub topic: String,
    pub end_offset: u64,
    pub partitions: Vec<i64>,
}

#[derive(Debug, Default)]
pub struct OffsetTable {
    topics: DashMap<String, TopicState>,
    total_end: AtomicU64,
    tick_events: AtomicU64,
}

impl OffsetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The only mutator. Safe under concurrent producer connections: the
    /// per-topic entry lock is the exclusion region, so a snapshot never
    /// observes a partially-updated topic.
    pub fn record_event(&self, topic: &str, partition: i64) {
        self.total_end.fetch_add(1, Ordering::Relaxed);
        self.tick_events.fetch_add(1, Ordering::Relaxed);

        let mut state = self.topics.entry(topic.to_string()).or_default();
        state.end_offset += 1;
        state.partitions.insert(partition);
    }

    /// Sorted-by-topic-name owned copy, suitable for serialization without
    /// holding any table lock.
    pub fn snapshot(&self) -> Vec<TopicView> {
        let mut views: Vec<TopicView> = self
            .topics
            .iter()
            .map(|entry| TopicView {
                topic: entry.key().clone(),
                end_offset: entry.value().end_offset,
                partitions: entry.value().partitions.iter().copied().collect(),
            })
            .collect();

        views.sort_by(|a, b| a.topic.cmp(&b.topic));
        views
    }

    /// Total events ever recorded, across all topics.
    pub fn total_end(&self) -> u64 {
        self.total_end.load(Ordering::Relaxed)
    }

    /// Events recorded since the previous drain. Called once per tick by the
    /// direct-mode snapshot builder; the count IS that tick's throughput.
    pub fn drain_tick(&self) -> u64 {
        self.tick_events.swap(0, Ordering::Relaxed)
    }
}
