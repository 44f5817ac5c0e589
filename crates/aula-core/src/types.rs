// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared between the session controller, the forwarder, and
//! messaging-client implementations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Platform tag stamped on every forwarded record.
pub const PLATFORM: &str = "whatsapp_group";

/// Unique identifier for a chat (conversation) on the messaging platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub String);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Connection state of the messaging session.
///
/// Disconnection is terminal: the controller surfaces it and stops rather
/// than re-entering the state machine (operator restart required).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    AwaitingPairing,
    Ready,
}

/// A chat as enumerated by the messaging client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub id: ChatId,
    pub name: String,
    pub is_group: bool,
}

/// A message as observed by the messaging client, live or from history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub id: MessageId,
    pub chat: ChatId,
    pub chat_name: String,
    pub is_group: bool,
    /// Author display identity (push name or number).
    pub author: String,
    pub text: String,
    /// Originating timestamp, epoch seconds.
    pub timestamp: i64,
    pub is_forwarded: bool,
    pub mentions: Vec<String>,
}

/// Inbound events pushed by a messaging client.
///
/// The capability's callbacks are modeled as this bounded set of variants so
/// the session state machine can be driven (and tested) without a live client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Pairing is required; `code` is the raw QR challenge payload.
    PairingRequired { code: String },
    /// The session is connected and message intake can begin.
    Ready,
    /// A message was observed live.
    Message(RawMessage),
    /// The client lost its connection. Terminal for this session.
    Disconnected { reason: String },
}

/// Normalized message unit delivered to the ingestion API.
///
/// Immutable once constructed; produced per accepted message and consumed
/// exactly once by the forwarder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRecord {
    pub platform: String,
    pub text: String,
    pub author: String,
    /// Originating timestamp, epoch seconds.
    pub ts: i64,
    pub meta: IngestMeta,
}

/// Metadata bag attached to every ingest record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestMeta {
    pub group_name: String,
    pub group_id: String,
    pub message_id: String,
    pub is_forwarded: bool,
    pub mentions: Vec<String>,
}

impl IngestRecord {
    /// Builds the normalized record for an accepted raw message.
    pub fn from_raw(raw: &RawMessage) -> Self {
        Self {
            platform: PLATFORM.to_string(),
            text: raw.text.clone(),
            author: raw.author.clone(),
            ts: raw.timestamp,
            meta: IngestMeta {
                group_name: raw.chat_name.clone(),
                group_id: raw.chat.0.clone(),
                message_id: raw.id.0.clone(),
                is_forwarded: raw.is_forwarded,
                mentions: raw.mentions.clone(),
            },
        }
    }
}
