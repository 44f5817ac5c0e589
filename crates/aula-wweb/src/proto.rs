// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire protocol spoken with the whatsapp-web.js sidecar.
//!
//! One JSON object per line in both directions. Events flow from the
//! sidecar on its stdout; commands go to its stdin.

use serde::{Deserialize, Serialize};

use aula_core::{ChatId, ChatSummary, MessageId, RawMessage};

/// Sidecar-to-bridge event.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireEvent {
    /// A pairing challenge must be shown to the operator.
    Qr { code: String },
    /// The session is authenticated and message delivery is live.
    Ready,
    Message { message: WireMessage },
    Disconnected { reason: String },
    /// Response to `ListChats`.
    Chats { chats: Vec<WireChat> },
    /// Response to `FetchRecent`, newest first.
    History {
        chat_id: String,
        messages: Vec<WireMessage>,
    },
    /// Sidecar-side failure report.
    Error { message: String },
}

/// Bridge-to-sidecar command.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireCommand {
    ListChats,
    FetchRecent { chat_id: String, limit: usize },
    Stop,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireChat {
    pub id: String,
    pub name: String,
    pub is_group: bool,
}

impl From<WireChat> for ChatSummary {
    fn from(chat: WireChat) -> Self {
        ChatSummary {
            id: ChatId(chat.id),
            name: chat.name,
            is_group: chat.is_group,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireMessage {
    pub id: String,
    pub chat_id: String,
    pub chat_name: String,
    pub is_group: bool,
    pub author: String,
    pub text: String,
    /// Unix seconds.
    pub timestamp: i64,
    #[serde(default)]
    pub is_forwarded: bool,
    #[serde(default)]
    pub mentions: Vec<String>,
}

impl From<WireMessage> for RawMessage {
    fn from(msg: WireMessage) -> Self {
        RawMessage {
            id: MessageId(msg.id),
            chat: ChatId(msg.chat_id),
            chat_name: msg.chat_name,
            is_group: msg.is_group,
            author: msg.author,
            text: msg.text,
            timestamp: msg.timestamp,
            is_forwarded: msg.is_forwarded,
            mentions: msg.mentions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_lines_parse_by_type_tag() {
        let event: WireEvent = serde_json::from_str(r#"{"type":"qr","code":"2@abc"}"#).unwrap();
        assert!(matches!(event, WireEvent::Qr { code } if code == "2@abc"));

        let event: WireEvent = serde_json::from_str(r#"{"type":"ready"}"#).unwrap();
        assert!(matches!(event, WireEvent::Ready));

        let event: WireEvent =
            serde_json::from_str(r#"{"type":"disconnected","reason":"LOGOUT"}"#).unwrap();
        assert!(matches!(event, WireEvent::Disconnected { reason } if reason == "LOGOUT"));
    }

    #[test]
    fn message_event_fills_optional_fields() {
        let line = r#"{"type":"message","message":{
            "id":"m1","chat_id":"123@g.us","chat_name":"Dudas Metalurgia",
            "is_group":true,"author":"51999@c.us","text":"examen parcial",
            "timestamp":1756500000}}"#;
        let event: WireEvent = serde_json::from_str(line).unwrap();
        let WireEvent::Message { message } = event else {
            panic!("expected message event");
        };
        let raw = RawMessage::from(message);
        assert_eq!(raw.chat.0, "123@g.us");
        assert!(!raw.is_forwarded);
        assert!(raw.mentions.is_empty());
    }

    #[test]
    fn commands_serialize_with_type_tag() {
        let line = serde_json::to_string(&WireCommand::FetchRecent {
            chat_id: "123@g.us".to_string(),
            limit: 50,
        })
        .unwrap();
        assert_eq!(
            line,
            r#"{"type":"fetch_recent","chat_id":"123@g.us","limit":50}"#
        );

        let line = serde_json::to_string(&WireCommand::ListChats).unwrap();
        assert_eq!(line, r#"{"type":"list_chats"}"#);
    }

    #[test]
    fn chat_summary_conversion_keeps_group_flag() {
        let chat = WireChat {
            id: "123@g.us".to_string(),
            name: "CF Metalurgia - Académico".to_string(),
            is_group: true,
        };
        let summary = ChatSummary::from(chat);
        assert!(summary.is_group);
        assert_eq!(summary.id.0, "123@g.us");
    }
}
