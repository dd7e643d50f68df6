pub mod builder;
pub mod models;

pub use builder::{direct_core, polled_snapshot, SnapshotCore, SnapshotSource, TickTotals};
pub use models::*;
