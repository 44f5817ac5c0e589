// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`MessagingClient`] backed by a whatsapp-web.js sidecar process.
//!
//! The sidecar owns the browser session, QR pairing, and the WhatsApp Web
//! connection; this crate only spawns it and speaks the newline-delimited
//! JSON protocol of [`proto`] over its stdio.

pub mod proto;

use std::collections::VecDeque;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, warn};

use aula_config::model::WhatsappConfig;
use aula_core::{AulaError, ChatId, ChatSummary, ClientEvent, MessagingClient, RawMessage};

use crate::proto::{WireCommand, WireEvent};

/// Grace period between the stop command and a hard kill.
const STOP_GRACE: Duration = Duration::from_secs(2);

fn client_err(
    message: impl Into<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
) -> AulaError {
    AulaError::Client {
        message: message.into(),
        source,
    }
}

/// Messaging client that drives an external sidecar process.
pub struct WwebClient {
    config: WhatsappConfig,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    lines: Option<Lines<BufReader<ChildStdout>>>,
    /// Events read while waiting for a command response.
    pending: VecDeque<WireEvent>,
}

impl WwebClient {
    pub fn new(config: WhatsappConfig) -> Self {
        Self {
            config,
            child: None,
            stdin: None,
            lines: None,
            pending: VecDeque::new(),
        }
    }

    /// Writes one command line to the sidecar's stdin.
    async fn send(&mut self, command: &WireCommand) -> Result<(), AulaError> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| client_err("sidecar not started", None))?;
        let mut line = serde_json::to_string(command)
            .map_err(|e| client_err("failed to encode command", Some(Box::new(e))))?;
        line.push('\n');
        stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| client_err("failed to write to sidecar", Some(Box::new(e))))?;
        stdin
            .flush()
            .await
            .map_err(|e| client_err("failed to write to sidecar", Some(Box::new(e))))?;
        Ok(())
    }

    /// Reads the next raw frame from the sidecar's stdout.
    async fn read_frame(&mut self) -> Result<WireEvent, AulaError> {
        let lines = self
            .lines
            .as_mut()
            .ok_or_else(|| client_err("sidecar not started", None))?;
        loop {
            let line = lines
                .next_line()
                .await
                .map_err(|e| client_err("failed to read from sidecar", Some(Box::new(e))))?
                .ok_or_else(|| client_err("sidecar closed its event stream", None))?;
            if line.trim().is_empty() {
                continue;
            }
            return serde_json::from_str(&line)
                .map_err(|e| client_err("malformed sidecar frame", Some(Box::new(e))));
        }
    }

    /// Next frame, draining queued events first.
    async fn next_frame(&mut self) -> Result<WireEvent, AulaError> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(event);
        }
        self.read_frame().await
    }
}

#[async_trait]
impl MessagingClient for WwebClient {
    async fn start(&mut self) -> Result<(), AulaError> {
        debug!(command = %self.config.command, "spawning whatsapp sidecar");
        let mut child = Command::new(&self.config.command)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                client_err(
                    format!("failed to spawn sidecar {:?}", self.config.command),
                    Some(Box::new(e)),
                )
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| client_err("sidecar stdin unavailable", None))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| client_err("sidecar stdout unavailable", None))?;

        self.stdin = Some(stdin);
        self.lines = Some(BufReader::new(stdout).lines());
        self.child = Some(child);
        Ok(())
    }

    async fn next_event(&mut self) -> Result<ClientEvent, AulaError> {
        loop {
            match self.next_frame().await? {
                WireEvent::Qr { code } => return Ok(ClientEvent::PairingRequired { code }),
                WireEvent::Ready => return Ok(ClientEvent::Ready),
                WireEvent::Message { message } => {
                    return Ok(ClientEvent::Message(RawMessage::from(message)));
                }
                WireEvent::Disconnected { reason } => {
                    return Ok(ClientEvent::Disconnected { reason });
                }
                WireEvent::Error { message } => {
                    warn!(message, "sidecar reported an error");
                }
                // Stray command responses carry no live event; drop them.
                WireEvent::Chats { .. } | WireEvent::History { .. } => {
                    warn!("dropping unsolicited sidecar response");
                }
            }
        }
    }

    async fn list_chats(&mut self) -> Result<Vec<ChatSummary>, AulaError> {
        self.send(&WireCommand::ListChats).await?;
        loop {
            match self.read_frame().await? {
                WireEvent::Chats { chats } => {
                    return Ok(chats.into_iter().map(ChatSummary::from).collect());
                }
                WireEvent::Error { message } => {
                    return Err(client_err(format!("chat enumeration failed: {message}"), None));
                }
                other => self.pending.push_back(other),
            }
        }
    }

    async fn fetch_recent(
        &mut self,
        chat: &ChatId,
        limit: usize,
    ) -> Result<Vec<RawMessage>, AulaError> {
        self.send(&WireCommand::FetchRecent {
            chat_id: chat.0.clone(),
            limit,
        })
        .await?;
        loop {
            match self.read_frame().await? {
                WireEvent::History { chat_id, messages } if chat_id == chat.0 => {
                    return Ok(messages.into_iter().map(RawMessage::from).collect());
                }
                WireEvent::Error { message } => {
                    return Err(client_err(
                        format!("history fetch failed for {chat}: {message}"),
                        None,
                    ));
                }
                other => self.pending.push_back(other),
            }
        }
    }

    async fn stop(&mut self) -> Result<(), AulaError> {
        if self.stdin.is_some() {
            // Best effort; the sidecar may already be gone.
            if let Err(e) = self.send(&WireCommand::Stop).await {
                debug!(error = %e, "stop command not delivered");
            }
        }
        self.stdin = None;
        self.lines = None;
        self.pending.clear();

        if let Some(mut child) = self.child.take() {
            match tokio::time::timeout(STOP_GRACE, child.wait()).await {
                Ok(Ok(status)) => debug!(%status, "sidecar exited"),
                Ok(Err(e)) => {
                    return Err(client_err("failed to reap sidecar", Some(Box::new(e))));
                }
                Err(_) => {
                    warn!("sidecar ignored stop, killing it");
                    child
                        .kill()
                        .await
                        .map_err(|e| client_err("failed to kill sidecar", Some(Box::new(e))))?;
                }
            }
        }
        Ok(())
    }
}
