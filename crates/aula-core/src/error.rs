// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Aula bridge.
//!
//! Configuration errors have their own type in `aula-config`; everything
//! else in the workspace shares this enum. Transport failures in the
//! forwarder and the probes are logged and swallowed at their source and
//! never surface here.

use thiserror::Error;

/// The primary error type used across the Aula workspace.
#[derive(Debug, Error)]
pub enum AulaError {
    /// Messaging-client errors (sidecar spawn failure, broken event stream,
    /// malformed wire frames, chat enumeration failures).
    #[error("client error: {message}")]
    Client {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Alert delivery errors, tagged with the channel that failed.
    #[error("notify error on channel {channel}: {message}")]
    Notify { channel: String, message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
