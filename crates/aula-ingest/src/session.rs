// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle controller.
//!
//! Owns the messaging client and drives the state machine
//! `Disconnected -> AwaitingPairing -> Ready -> Disconnected`. The client's
//! push-style callbacks arrive as [`ClientEvent`] variants, so every state
//! transition goes through [`SessionController::handle_event`] and can be
//! tested without a live client.
//!
//! Disconnection is terminal: the controller stops and the operator (or the
//! process supervisor) restarts the bridge.

use std::collections::HashSet;
use std::ops::ControlFlow;
use std::time::Duration;

use aula_config::model::BridgeConfig;
use aula_core::{
    AulaError, ChatId, ClientEvent, ConnectionState, IngestRecord, MessagingClient, RawMessage,
};
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::filter;
use crate::forwarder::Forwarder;

/// Drives one messaging session from start to disconnect or shutdown.
pub struct SessionController<C: MessagingClient> {
    client: C,
    forwarder: Forwarder,
    config: BridgeConfig,
    state: ConnectionState,
    target_chats: HashSet<ChatId>,
    last_activity: DateTime<Utc>,
}

impl<C: MessagingClient> SessionController<C> {
    pub fn new(client: C, forwarder: Forwarder, config: BridgeConfig) -> Self {
        Self {
            client,
            forwarder,
            config,
            state: ConnectionState::Disconnected,
            target_chats: HashSet::new(),
            last_activity: Utc::now(),
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Chat identifiers recorded at session start. Fixed for the session:
    /// there is no dynamic re-discovery.
    pub fn target_chats(&self) -> &HashSet<ChatId> {
        &self.target_chats
    }

    /// Timestamp of the last forwarded message.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// The owned messaging client (for post-run inspection in tests).
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Runs the session until disconnect, event-stream failure, or shutdown.
    ///
    /// A failure of the initial [`MessagingClient::start`] is the only error
    /// that propagates; everything after that is logged and contained. The
    /// client is released before returning, on every path.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), AulaError> {
        self.client.start().await?;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("shutdown requested, releasing messaging client");
                    break;
                }
                event = self.client.next_event() => {
                    match event {
                        Ok(event) => {
                            if self.handle_event(event).await.is_break() {
                                break;
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "event stream failed, stopping session");
                            break;
                        }
                    }
                }
            }
        }

        if let Err(e) = self.client.stop().await {
            warn!(error = %e, "error releasing messaging client");
        }
        Ok(())
    }

    /// Dispatches one inbound event into the state machine.
    pub async fn handle_event(&mut self, event: ClientEvent) -> ControlFlow<()> {
        match event {
            ClientEvent::PairingRequired { code } => {
                self.state = ConnectionState::AwaitingPairing;
                info!("pairing required, rendering QR challenge");
                print_pairing_challenge(&code);
                ControlFlow::Continue(())
            }
            ClientEvent::Ready => {
                self.state = ConnectionState::Ready;
                info!("messaging session ready");
                if let Err(e) = self.on_ready().await {
                    error!(error = %e, "session setup failed");
                }
                ControlFlow::Continue(())
            }
            ClientEvent::Message(raw) => {
                self.on_message(raw).await;
                ControlFlow::Continue(())
            }
            ClientEvent::Disconnected { reason } => {
                self.state = ConnectionState::Disconnected;
                warn!(
                    reason = reason.as_str(),
                    "messaging session disconnected; manual restart required"
                );
                ControlFlow::Break(())
            }
        }
    }

    /// One-time setup after the session connects: record target groups from
    /// the current chat list, then run the history backfill.
    async fn on_ready(&mut self) -> Result<(), AulaError> {
        let chats = self.client.list_chats().await?;
        self.target_chats.clear();
        for chat in chats {
            if chat.is_group && self.matches_target(&chat.name) {
                info!(group = chat.name.as_str(), id = %chat.id, "monitoring group");
                self.target_chats.insert(chat.id);
            }
        }
        if self.target_chats.is_empty() {
            warn!("no configured target groups found in chat list");
        }
        self.backfill().await;
        Ok(())
    }

    fn matches_target(&self, chat_name: &str) -> bool {
        let lower = chat_name.to_lowercase();
        self.config
            .target_groups
            .iter()
            .any(|target| lower.contains(&target.to_lowercase()))
    }

    /// Guards, in order: group-typed, targeted, relevant. On pass the record
    /// is forwarded; forward failures never affect subsequent messages.
    async fn on_message(&mut self, raw: RawMessage) {
        if !raw.is_group {
            return;
        }
        if !self.target_chats.contains(&raw.chat) {
            return;
        }
        if !filter::is_relevant(&raw.text) {
            debug!(message_id = raw.id.0.as_str(), "message filtered out");
            return;
        }

        let record = IngestRecord::from_raw(&raw);
        self.forwarder.forward(&record).await;
        self.last_activity = Utc::now();
    }

    /// One-shot history backfill over all target groups.
    ///
    /// Per group: fetch the most recent messages, process oldest-first, skip
    /// anything outside the day window, and pace processed messages
    /// sequentially to respect the ingest API's rate limits. One group's
    /// fetch failure never aborts the remaining groups.
    async fn backfill(&mut self) {
        info!(
            groups = self.target_chats.len(),
            limit = self.config.backfill_limit,
            "starting history backfill"
        );
        let pace = Duration::from_millis(self.config.backfill_pace_ms);
        let max_age_secs = self.config.backfill_max_age_days as i64 * 86_400;
        let targets: Vec<ChatId> = self.target_chats.iter().cloned().collect();

        for chat in targets {
            let mut messages = match self
                .client
                .fetch_recent(&chat, self.config.backfill_limit)
                .await
            {
                Ok(messages) => messages,
                Err(e) => {
                    warn!(chat = %chat, error = %e, "history fetch failed, skipping group");
                    continue;
                }
            };

            // The client returns newest first; process oldest first.
            messages.reverse();
            for message in messages {
                let age_secs = Utc::now().timestamp() - message.timestamp;
                if age_secs <= max_age_secs {
                    self.on_message(message).await;
                    tokio::time::sleep(pace).await;
                }
            }
        }
        info!("history backfill complete");
    }
}

/// Renders the pairing challenge for the operator: a terminal QR plus the
/// raw code for remote hosts where the QR is unreadable.
fn print_pairing_challenge(code: &str) {
    match qrcode::QrCode::new(code.as_bytes()) {
        Ok(qr) => {
            let rendered = qr
                .render::<qrcode::render::unicode::Dense1x2>()
                .quiet_zone(true)
                .build();
            println!("Escanea este QR con WhatsApp:\n{rendered}");
        }
        Err(e) => {
            warn!(error = %e, "failed to render QR challenge");
        }
    }
    println!("pairing code: {code}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use aula_config::model::IngestConfig;
    use aula_core::{ChatSummary, MessageId};
    use aula_test_utils::MockClient;

    fn test_config() -> BridgeConfig {
        BridgeConfig {
            target_groups: vec!["Dudas Metalurgia".into()],
            backfill_pace_ms: 1,
            ..BridgeConfig::default()
        }
    }

    fn forwarder() -> Forwarder {
        // Unroutable sink: forward attempts are swallowed either way.
        Forwarder::new(&IngestConfig {
            api_url: "http://127.0.0.1:1/ingest/messages".into(),
        })
        .unwrap()
    }

    fn controller(client: MockClient) -> SessionController<MockClient> {
        SessionController::new(client, forwarder(), test_config())
    }

    #[tokio::test]
    async fn pairing_event_moves_to_awaiting_pairing() {
        let mut session = controller(MockClient::new());
        let flow = session
            .handle_event(ClientEvent::PairingRequired { code: "2@abc".into() })
            .await;
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(session.state(), ConnectionState::AwaitingPairing);
    }

    #[tokio::test]
    async fn ready_records_matching_groups_only() {
        let client = MockClient::new().with_chats(vec![
            ChatSummary {
                id: ChatId("1@g.us".into()),
                name: "Dudas Metalurgia 2025".into(),
                is_group: true,
            },
            ChatSummary {
                id: ChatId("2@g.us".into()),
                name: "Familia".into(),
                is_group: true,
            },
            ChatSummary {
                // Name matches, but not a group.
                id: ChatId("3@c.us".into()),
                name: "dudas metalurgia".into(),
                is_group: false,
            },
        ]);
        let mut session = controller(client);

        session.handle_event(ClientEvent::Ready).await;

        assert_eq!(session.state(), ConnectionState::Ready);
        assert_eq!(session.target_chats().len(), 1);
        assert!(session.target_chats().contains(&ChatId("1@g.us".into())));
    }

    #[tokio::test]
    async fn target_match_is_case_insensitive_substring() {
        let client = MockClient::new().with_chats(vec![ChatSummary {
            id: ChatId("1@g.us".into()),
            name: "[Oficial] DUDAS metalurgia UNSAAC".into(),
            is_group: true,
        }]);
        let mut session = controller(client);
        session.handle_event(ClientEvent::Ready).await;
        assert_eq!(session.target_chats().len(), 1);
    }

    #[tokio::test]
    async fn disconnect_is_terminal() {
        let mut session = controller(MockClient::new());
        session.handle_event(ClientEvent::Ready).await;

        let flow = session
            .handle_event(ClientEvent::Disconnected { reason: "NAVIGATION".into() })
            .await;
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn list_chats_failure_is_contained() {
        let client = MockClient::new().with_failing_chats();
        let mut session = controller(client);

        // Must not panic or break the loop; targets just stay empty.
        let flow = session.handle_event(ClientEvent::Ready).await;
        assert_eq!(flow, ControlFlow::Continue(()));
        assert!(session.target_chats().is_empty());
    }

    #[tokio::test]
    async fn untargeted_message_does_not_touch_activity() {
        let mut session = controller(MockClient::new());
        session.handle_event(ClientEvent::Ready).await;
        let before = session.last_activity();

        let raw = RawMessage {
            id: MessageId("m1".into()),
            chat: ChatId("999@g.us".into()),
            chat_name: "Otro grupo".into(),
            is_group: true,
            author: "Luis".into(),
            text: "¿Cuándo es el examen de fundición?".into(),
            timestamp: Utc::now().timestamp(),
            is_forwarded: false,
            mentions: vec![],
        };
        session.handle_event(ClientEvent::Message(raw)).await;
        assert_eq!(session.last_activity(), before);
    }
}
