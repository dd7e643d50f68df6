//! Event Ingestor: best-effort parse of one text record into a topic/partition
//! bucket. Ingestion never rejects input; malformed records degrade to the
//! default bucket and are still counted.

use serde_json::Value;

use crate::ingest::offsets::OffsetTable;

pub const DEFAULT_TOPIC: &str = "demo";
pub const DEFAULT_PARTITION: i64 = 0;

/// Where a record arrived from. Observability only: both origins are
/// counted identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Producer,
    Engine,
}

impl Origin {
    pub fn label(&self) -> &'static str {
        match self {
            Origin::Producer => "producer",
            Origin::Engine => "engine",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEvent {
    pub topic: String,
    pub partition: i64,
}

/// Total function: every record resolves to some bucket.
/// `topic` must be a non-empty string, `partition` anything coercible to a
/// number; anything else (including a parse failure) falls back to the
/// default topic / partition 0.
pub fn resolve_event(record: &str) -> ResolvedEvent {
    let obj = match serde_json::from_str::<Value>(record) {
        Ok(Value::Object(obj)) => obj,
        // Valid JSON without fields, or no JSON at all: default bucket.
        Ok(_) | Err(_) => {
            return ResolvedEvent {
                topic: DEFAULT_TOPIC.to_string(),
                partition: DEFAULT_PARTITION,
            }
        }
    };

    let topic = match obj.get("topic") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => DEFAULT_TOPIC.to_string(),
    };

    let partition = obj
        .get("partition")
        .and_then(coerce_partition)
        .unwrap_or(DEFAULT_PARTITION);

    ResolvedEvent { topic, partition }
}

/// Records one event against the table. Never fails.
pub fn record_line(table: &OffsetTable, record: &str, origin: Origin) {
    let event = resolve_event(record);
    table.record_event(&event.topic, event.partition);

    tracing::trace!(
        origin = origin.label(),
        topic = %event.topic,
        partition = event.partition,
        "event recorded"
    );
}

// Accepts JSON numbers and numeric strings, like the wire's producers send.
fn coerce_partition(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    }
}
