// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Aula integration tests.

pub mod mock_client;

pub use mock_client::MockClient;

use aula_core::{ChatId, MessageId, RawMessage};

/// Builds a group message fixture with a unique id.
pub fn group_message(chat: &ChatId, text: &str, timestamp: i64) -> RawMessage {
    RawMessage {
        id: MessageId(format!("test-{}", uuid::Uuid::new_v4())),
        chat: chat.clone(),
        chat_name: "Dudas Metalurgia".to_string(),
        is_group: true,
        author: "test-user".to_string(),
        text: text.to_string(),
        timestamp,
        is_forwarded: false,
        mentions: Vec::new(),
    }
}

/// Builds a direct (non-group) message fixture.
pub fn direct_message(chat: &ChatId, text: &str, timestamp: i64) -> RawMessage {
    RawMessage {
        is_group: false,
        chat_name: "test-user".to_string(),
        ..group_message(chat, text, timestamp)
    }
}
