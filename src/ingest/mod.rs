pub mod event;
pub mod offsets;
pub mod producer;

pub use event::{record_line, resolve_event, Origin, ResolvedEvent, DEFAULT_PARTITION, DEFAULT_TOPIC};
pub use offsets::{OffsetTable, TopicView};
