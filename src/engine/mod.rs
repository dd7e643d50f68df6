pub mod client;
pub mod errors;
pub mod link;
pub mod protocol;

pub use client::EngineClient;
pub use errors::EngineError;
pub use protocol::{EngineRequest, GroupStatsResponse, TopicsResponse};
