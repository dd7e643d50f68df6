//! Snapshot Builder: turns either the local offset table (direct mode) or a
//! pair of engine query responses (polling mode) into one immutable
//! `Snapshot` per tick.

use std::sync::Arc;

use crate::engine::client::EngineClient;
use crate::engine::errors::EngineError;
use crate::ingest::offsets::OffsetTable;
use crate::snapshot::models::{
    Derived, GroupPartitionStat, GroupStats, GroupStatsView, GroupTopicStats, PartitionStat,
    Snapshot, TopicStats,
};

/// The two operating modes behind one seam, selected once at startup and
/// never combined against the same state.
pub enum SnapshotSource {
    Direct(Arc<OffsetTable>),
    Polling(EngineClient),
}

impl SnapshotSource {
    pub fn mode(&self) -> &'static str {
        match self {
            SnapshotSource::Direct(_) => "direct",
            SnapshotSource::Polling(_) => "polling",
        }
    }
}

/// Totals a session remembers from its previous polled snapshot, used for
/// the throughput delta on the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTotals {
    pub now: u64,
    pub total_end: u64,
}

/// The session-independent part of a direct-mode tick: topic view and
/// derived totals, computed once and shared by every session. Only the
/// group label differs per session.
#[derive(Debug, Clone)]
pub struct SnapshotCore {
    pub now: u64,
    pub derived: Derived,
    pub topics: Vec<TopicStats>,
}

impl SnapshotCore {
    /// Stamps a group onto the shared core. Direct mode assumes the
    /// consumer is caught up: committed == end, lag == 0.
    pub fn for_group(&self, group: &str) -> Snapshot {
        let topics = self
            .topics
            .iter()
            .map(|t| GroupTopicStats {
                topic: t.topic.clone(),
                partitions_stats: t
                    .partition_stats
                    .iter()
                    .map(|p| GroupPartitionStat {
                        partition: p.partition,
                        committed_offset: p.end_offset,
                        end_offset: p.end_offset,
                        lag: 0,
                    })
                    .collect(),
            })
            .collect();

        Snapshot {
            now: self.now,
            derived: self.derived.clone(),
            topics: self.topics.clone(),
            group_stats: GroupStatsView::Built(GroupStats {
                group: group.to_string(),
                topics,
            }),
        }
    }
}

/// Direct-mode build. Called exactly once per tick: draining the per-tick
/// counter is what makes its value the tick's throughput. Every partition
/// of a topic reports the topic's counter (offsets are tracked per-topic).
pub fn direct_core(table: &OffsetTable) -> SnapshotCore {
    let throughput = table.drain_tick();
    let total_end = table.total_end();

    let topics = table
        .snapshot()
        .into_iter()
        .map(|view| TopicStats {
            partition_stats: view
                .partitions
                .iter()
                .map(|&partition| PartitionStat {
                    partition,
                    end_offset: view.end_offset,
                })
                .collect(),
            topic: view.topic,
        })
        .collect();

    SnapshotCore {
        now: epoch_ms(),
        derived: Derived {
            throughput_per_sec: throughput as f64,
            total_end,
        },
        topics,
    }
}

/// Polling-mode build: two sequential engine calls, group stats passed
/// through verbatim, throughput derived from the previous totals for this
/// session (0 without priors or non-positive elapsed time).
pub async fn polled_snapshot(
    client: &EngineClient,
    group: &str,
    previous: Option<&TickTotals>,
) -> Result<(Snapshot, TickTotals), EngineError> {
    let topics_response = client.fetch_topics().await?;
    let stats = client.fetch_group_stats(group).await?;

    let now = epoch_ms();

    let mut topics = topics_response.topics;
    topics.sort_by(|a, b| a.topic.cmp(&b.topic));

    let total_end: u64 = topics
        .iter()
        .flat_map(|t| &t.partition_stats)
        .map(|p| p.end_offset)
        .sum();

    let throughput_per_sec = match previous {
        Some(prev) if now > prev.now => {
            let dt_secs = (now - prev.now) as f64 / 1000.0;
            (total_end as f64 - prev.total_end as f64) / dt_secs
        }
        _ => 0.0,
    };

    let snapshot = Snapshot {
        now,
        derived: Derived {
            throughput_per_sec,
            total_end,
        },
        topics,
        group_stats: GroupStatsView::Raw(stats),
    };

    Ok((snapshot, TickTotals { now, total_end }))
}

fn epoch_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}
