// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The messaging-client capability trait.
//!
//! The underlying transport (QR pairing, browser automation) is external to
//! this workspace; implementations only expose it at this boundary. The
//! session controller is the sole caller and drives the client from a single
//! control flow, so all methods take `&mut self`.

use async_trait::async_trait;

use crate::error::AulaError;
use crate::types::{ChatId, ChatSummary, ClientEvent, RawMessage};

/// Capability that produces messaging events and answers chat queries.
#[async_trait]
pub trait MessagingClient: Send {
    /// Initializes the underlying messaging capability.
    ///
    /// Failure here is the only fatal error in the bridge: it surfaces as a
    /// visible startup failure instead of being swallowed.
    async fn start(&mut self) -> Result<(), AulaError>;

    /// Waits for the next inbound event (pairing challenge, readiness,
    /// live message, or disconnect).
    async fn next_event(&mut self) -> Result<ClientEvent, AulaError>;

    /// Enumerates all chats currently exposed by the capability.
    async fn list_chats(&mut self) -> Result<Vec<ChatSummary>, AulaError>;

    /// Fetches up to `limit` most recent messages of a chat, newest first.
    async fn fetch_recent(
        &mut self,
        chat: &ChatId,
        limit: usize,
    ) -> Result<Vec<RawMessage>, AulaError>;

    /// Releases the underlying capability.
    ///
    /// Must be safe to call even if [`start`](Self::start) never completed.
    async fn stop(&mut self) -> Result<(), AulaError>;
}
