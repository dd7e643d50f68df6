use std::time::Duration;

/// Failure taxonomy for one engine query. None of these are fatal to the
/// process; they surface to the affected dashboard session as an `ERROR`
/// message and that tick's snapshot is skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The connection could not be established, or dropped before a
    /// complete record arrived.
    Connection(String),
    /// No complete record arrived within the configured budget.
    Timeout(Duration),
    /// The engine answered with non-JSON or malformed-shape data.
    Protocol(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Connection(msg) => write!(f, "engine error: {}", msg),
            EngineError::Timeout(budget) => write!(f, "engine timeout after {:?}", budget),
            EngineError::Protocol(msg) => write!(f, "engine protocol error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        EngineError::Connection(error.to_string())
    }
}

impl From<crate::protocol::FrameError> for EngineError {
    fn from(error: crate::protocol::FrameError) -> Self {
        EngineError::Connection(error.to_string())
    }
}
