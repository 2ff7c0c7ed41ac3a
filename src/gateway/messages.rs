//! Wire-level frames of the `/ws` gateway.
//!
//! Every frame is `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

/// Inbound frame sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ClientFrame {
    Message(OutgoingMessage),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutgoingMessage {
    /// 接收者
    pub user_id: i32,
    pub message: String,
}

/// Outbound frame pushed to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ServerFrame {
    Message(RelayedMessage),
    Ack(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayedMessage {
    pub from: i32,
    pub message: String,
}

impl ServerFrame {
    pub fn ack() -> Self {
        ServerFrame::Ack("ok".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_client_message() {
        let frame: ClientFrame = serde_json::from_value(json!({
            "event": "message",
            "data": {"user_id": 7, "message": "salut"}
        }))
        .unwrap();
        assert_eq!(
            frame,
            ClientFrame::Message(OutgoingMessage {
                user_id: 7,
                message: "salut".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_event_rejected() {
        let result = serde_json::from_value::<ClientFrame>(json!({
            "event": "typing",
            "data": {"user_id": 7}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_server_frames_shape() {
        let relayed = ServerFrame::Message(RelayedMessage {
            from: 3,
            message: "hi".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&relayed).unwrap(),
            json!({"event": "message", "data": {"from": 3, "message": "hi"}})
        );
        assert_eq!(
            serde_json::to_value(ServerFrame::ack()).unwrap(),
            json!({"event": "ack", "data": "ok"})
        );
    }
}
