//! Snapshot wire models. Field names match the dashboard wire format; the
//! mixed snake/camel casing is the documented protocol, not an accident.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionStat {
    #[serde(default)]
    pub partition: i64,
    #[serde(default)]
    pub end_offset: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicStats {
    pub topic: String,
    #[serde(default)]
    pub partition_stats: Vec<PartitionStat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupPartitionStat {
    pub partition: i64,
    pub committed_offset: u64,
    pub end_offset: u64,
    pub lag: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupTopicStats {
    pub topic: String,
    pub partitions_stats: Vec<GroupPartitionStat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupStats {
    pub group: String,
    pub topics: Vec<GroupTopicStats>,
}

/// Group stats are built locally in direct mode and passed through verbatim
/// from the engine in polling mode. The raw form keeps whatever fields the
/// engine sent.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GroupStatsView {
    Built(GroupStats),
    Raw(Value),
}

#[derive(Debug, Clone, Serialize)]
pub struct Derived {
    pub throughput_per_sec: f64,
    #[serde(rename = "totalEnd")]
    pub total_end: u64,
}

/// One broadcast unit: offsets, group stats and derived metrics at an
/// instant. Immutable once built; topics are sorted by name ascending.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub now: u64,
    pub derived: Derived,
    pub topics: Vec<TopicStats>,
    #[serde(rename = "groupStats")]
    pub group_stats: GroupStatsView,
}
