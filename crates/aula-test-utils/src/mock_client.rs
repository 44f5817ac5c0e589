// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messaging client for deterministic testing.
//!
//! `MockClient` implements [`MessagingClient`] with injectable events and
//! scripted chat/history responses, so session-controller tests run without
//! a live sidecar.

use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use tokio::sync::mpsc;

use aula_core::{
    AulaError, ChatId, ChatSummary, ClientEvent, MessagingClient, RawMessage,
};

/// A scripted messaging client for tests.
///
/// Events are delivered in injection order; `list_chats` and `fetch_recent`
/// answer from configured fixtures, or fail when scripted to.
pub struct MockClient {
    events_tx: mpsc::UnboundedSender<ClientEvent>,
    events_rx: mpsc::UnboundedReceiver<ClientEvent>,
    chats: Vec<ChatSummary>,
    history: HashMap<ChatId, Vec<RawMessage>>,
    failing_chats: bool,
    failing_history: HashSet<ChatId>,
    fetch_calls: VecDeque<(ChatId, usize)>,
    started: bool,
    stopped: bool,
}

impl MockClient {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            events_tx,
            events_rx,
            chats: Vec::new(),
            history: HashMap::new(),
            failing_chats: false,
            failing_history: HashSet::new(),
            fetch_calls: VecDeque::new(),
            started: false,
            stopped: false,
        }
    }

    /// Sets the chat list returned by `list_chats`.
    pub fn with_chats(mut self, chats: Vec<ChatSummary>) -> Self {
        self.chats = chats;
        self
    }

    /// Sets the history returned by `fetch_recent` for one chat
    /// (newest first, as the real client delivers it).
    pub fn with_history(mut self, chat: ChatId, messages: Vec<RawMessage>) -> Self {
        self.history.insert(chat, messages);
        self
    }

    /// Makes `list_chats` fail.
    pub fn with_failing_chats(mut self) -> Self {
        self.failing_chats = true;
        self
    }

    /// Makes `fetch_recent` fail for one chat.
    pub fn with_failing_history(mut self, chat: ChatId) -> Self {
        self.failing_history.insert(chat);
        self
    }

    /// Queues an event for delivery by `next_event`.
    pub fn push_event(self, event: ClientEvent) -> Self {
        self.events_tx.send(event).expect("mock event queue closed");
        self
    }

    /// Handle for injecting events after the client has been handed off.
    pub fn event_sender(&self) -> mpsc::UnboundedSender<ClientEvent> {
        self.events_tx.clone()
    }

    /// Chats and limits passed to `fetch_recent`, in call order.
    pub fn fetch_calls(&self) -> &VecDeque<(ChatId, usize)> {
        &self.fetch_calls
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagingClient for MockClient {
    async fn start(&mut self) -> Result<(), AulaError> {
        self.started = true;
        Ok(())
    }

    async fn next_event(&mut self) -> Result<ClientEvent, AulaError> {
        // The client keeps its own sender, so this pends when the script is
        // exhausted instead of erroring; tests end via Disconnected or cancel.
        self.events_rx.recv().await.ok_or_else(|| AulaError::Client {
            message: "mock event queue closed".into(),
            source: None,
        })
    }

    async fn list_chats(&mut self) -> Result<Vec<ChatSummary>, AulaError> {
        if self.failing_chats {
            return Err(AulaError::Client {
                message: "scripted chat enumeration failure".into(),
                source: None,
            });
        }
        Ok(self.chats.clone())
    }

    async fn fetch_recent(
        &mut self,
        chat: &ChatId,
        limit: usize,
    ) -> Result<Vec<RawMessage>, AulaError> {
        self.fetch_calls.push_back((chat.clone(), limit));
        if self.failing_history.contains(chat) {
            return Err(AulaError::Client {
                message: format!("scripted history failure for {chat}"),
                source: None,
            });
        }
        let mut messages = self.history.get(chat).cloned().unwrap_or_default();
        messages.truncate(limit);
        Ok(messages)
    }

    async fn stop(&mut self) -> Result<(), AulaError> {
        self.stopped = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group_message;

    #[tokio::test]
    async fn events_are_delivered_in_order() {
        let mut client = MockClient::new()
            .push_event(ClientEvent::PairingRequired { code: "2@abc".into() })
            .push_event(ClientEvent::Ready);
        client.start().await.unwrap();

        assert!(matches!(
            client.next_event().await.unwrap(),
            ClientEvent::PairingRequired { .. }
        ));
        assert_eq!(client.next_event().await.unwrap(), ClientEvent::Ready);
    }

    #[tokio::test]
    async fn fetch_recent_honors_limit_and_records_calls() {
        let chat = ChatId("1@g.us".into());
        let messages = vec![
            group_message(&chat, "uno", 100),
            group_message(&chat, "dos", 90),
            group_message(&chat, "tres", 80),
        ];
        let mut client = MockClient::new().with_history(chat.clone(), messages);

        let fetched = client.fetch_recent(&chat, 2).await.unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(client.fetch_calls().front(), Some(&(chat, 2)));
    }

    #[tokio::test]
    async fn stop_is_safe_without_start() {
        let mut client = MockClient::new();
        assert!(client.stop().await.is_ok());
        assert!(client.is_stopped());
        assert!(!client.is_started());
    }
}
