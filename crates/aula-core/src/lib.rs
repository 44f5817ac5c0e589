// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Aula bridge.
//!
//! Provides the shared error type, the normalized message model, and the
//! [`MessagingClient`] capability trait implemented by platform adapters
//! and test doubles.

pub mod client;
pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use client::MessagingClient;
pub use error::AulaError;
pub use types::{
    ChatId, ChatSummary, ClientEvent, ConnectionState, IngestMeta, IngestRecord, MessageId,
    RawMessage, PLATFORM,
};
