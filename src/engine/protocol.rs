//! Engine request/response protocol: one JSON object plus `\n` each way.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::snapshot::models::TopicStats;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum EngineRequest {
    #[serde(rename = "TOPICS")]
    Topics,
    #[serde(rename = "GROUP_STATS")]
    GroupStats { group: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicsResponse {
    #[serde(default)]
    pub topics: Vec<TopicStats>,
}

/// Group stats stay raw JSON: the gateway passes them through verbatim and
/// does not recompute lag or cross-check partitions.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupStatsResponse {
    #[serde(default)]
    pub stats: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_serialize_to_wire_shape() {
        assert_eq!(
            serde_json::to_string(&EngineRequest::Topics).unwrap(),
            r#"{"type":"TOPICS"}"#
        );
        assert_eq!(
            serde_json::to_string(&EngineRequest::GroupStats { group: "g2".to_string() }).unwrap(),
            r#"{"type":"GROUP_STATS","group":"g2"}"#
        );
    }

    #[test]
    fn topics_response_parses() {
        let res: TopicsResponse = serde_json::from_str(
            r#"{"topics":[{"topic":"orders","partition_stats":[{"partition":0,"end_offset":12}]}]}"#,
        )
        .unwrap();
        assert_eq!(res.topics.len(), 1);
        assert_eq!(res.topics[0].partition_stats[0].end_offset, 12);
    }

    #[test]
    fn missing_topics_field_defaults_to_empty() {
        let res: TopicsResponse = serde_json::from_str("{}").unwrap();
        assert!(res.topics.is_empty());
    }
}
