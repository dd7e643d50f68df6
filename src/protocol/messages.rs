//! Dashboard channel wire types. Field names match the wire format exactly.

use serde::{Deserialize, Serialize};

use crate::snapshot::models::Snapshot;

/// Server -> client messages pushed over the dashboard channel.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Greeting, sent once per session before the first tick-driven push.
    #[serde(rename = "HELLO")]
    Hello {
        groups: Vec<String>,
        #[serde(rename = "defaultGroup")]
        default_group: String,
    },
    #[serde(rename = "SNAPSHOT")]
    Snapshot(Snapshot),
    #[serde(rename = "ERROR")]
    Error { message: String },
}

/// Client -> server control messages. Anything that fails to parse as one
/// of these is silently ignored by the session.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Changes which consumer group this session's next snapshot reflects.
    #[serde(rename = "SET_GROUP")]
    SetGroup { group: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_group_parses() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"SET_GROUP","group":"g2"}"#).unwrap();
        let ClientMessage::SetGroup { group } = msg;
        assert_eq!(group, "g2");
    }

    #[test]
    fn unknown_message_type_is_an_error() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"NOPE"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not-json").is_err());
    }

    #[test]
    fn error_message_wire_shape() {
        let json = serde_json::to_string(&ServerMessage::Error {
            message: "engine timeout".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"ERROR","message":"engine timeout"}"#);
    }

    #[test]
    fn hello_uses_wire_field_names() {
        let json = serde_json::to_string(&ServerMessage::Hello {
            groups: vec!["g1".to_string()],
            default_group: "g1".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"HELLO","groups":["g1"],"defaultGroup":"g1"}"#);
    }
}
