// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alert events and multi-channel fan-out.
//!
//! The notifier owns an explicit list of channel handlers built from whatever
//! configuration is present; an absent credential silently disables that
//! channel only. Every channel is attempted independently: one failure is
//! logged with the channel name and never prevents the others, so the
//! aggregate `notify` call cannot fail.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use aula_config::model::AlertsConfig;
use aula_core::AulaError;

use crate::status::{Service, ServiceStatusMap};

/// Request timeout for alert deliveries.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Emitted when a service's liveness flipped between two consecutive polls.
/// Ephemeral: exists only for the duration of the fan-out call.
#[derive(Debug, Clone)]
pub struct AlertEvent {
    pub service: Service,
    /// The new liveness value.
    pub status: bool,
    /// Pre-rendered human message shared by all channels.
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Snapshot of the full status map at emission time.
    pub all_services: ServiceStatusMap,
}

impl AlertEvent {
    /// Builds the event for one detected transition.
    pub fn transition(service: Service, status: bool, snapshot: &ServiceStatusMap) -> Self {
        let timestamp = snapshot.last_check;
        Self {
            service,
            status,
            message: render_alert(service, status, snapshot),
            timestamp,
            all_services: *snapshot,
        }
    }
}

fn status_word(up: bool) -> &'static str {
    if up { "CONECTADO" } else { "DESCONECTADO" }
}

fn status_mark(up: bool) -> &'static str {
    if up { "OK" } else { "CAIDO" }
}

/// Renders the operator-facing alert body: service, ISO-8601 timestamp,
/// connected/disconnected status, and all three services' current state.
fn render_alert(service: Service, up: bool, snapshot: &ServiceStatusMap) -> String {
    let headline = if up {
        format!("{service} se ha reconectado")
    } else {
        format!("ALERTA: {service} está desconectado")
    };

    format!(
        "*Aula Monitor*\n\
         Servicio: {service}\n\
         Timestamp: {}\n\
         Estado: {}\n\
         {headline}\n\
         \n\
         Estado de todos los servicios:\n\
         - {}: {}\n\
         - {}: {}\n\
         - {}: {}",
        snapshot.last_check.to_rfc3339_opts(SecondsFormat::Secs, true),
        status_word(up),
        Service::Bridge.display_name(),
        status_mark(snapshot.bridge),
        Service::Api.display_name(),
        status_mark(snapshot.api),
        Service::Worker.display_name(),
        status_mark(snapshot.worker),
    )
}

/// One delivery target for alert events.
#[async_trait]
pub trait AlertChannel: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, event: &AlertEvent) -> Result<(), AulaError>;
}

fn http_client(channel: &str) -> Result<reqwest::Client, AulaError> {
    reqwest::Client::builder()
        .timeout(NOTIFY_TIMEOUT)
        .build()
        .map_err(|e| AulaError::Notify {
            channel: channel.to_string(),
            message: format!("failed to create HTTP client: {e}"),
        })
}

fn delivery_error(channel: &str, error: impl std::fmt::Display) -> AulaError {
    AulaError::Notify {
        channel: channel.to_string(),
        message: error.to_string(),
    }
}

async fn check_response(channel: &str, resp: reqwest::Response) -> Result<(), AulaError> {
    if resp.status().is_success() {
        Ok(())
    } else {
        Err(AulaError::Notify {
            channel: channel.to_string(),
            message: format!("endpoint answered {}", resp.status()),
        })
    }
}

/// Telegram Bot API channel.
pub struct TelegramAlert {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramAlert {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self, AulaError> {
        Self::with_api_base(TELEGRAM_API_BASE, bot_token, chat_id)
    }

    /// Constructor with an explicit API base, for tests against a local server.
    pub fn with_api_base(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self, AulaError> {
        Ok(Self {
            client: http_client("telegram")?,
            api_base: api_base.into(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        })
    }
}

#[async_trait]
impl AlertChannel for TelegramAlert {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, event: &AlertEvent) -> Result<(), AulaError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let resp = self
            .client
            .post(&url)
            .json(&json!({
                "chat_id": self.chat_id,
                "text": event.message,
                "parse_mode": "Markdown",
            }))
            .send()
            .await
            .map_err(|e| delivery_error(self.name(), e))?;
        check_response(self.name(), resp).await
    }
}

/// Wire payload of the generic webhook channel.
#[derive(Serialize)]
struct WebhookPayload<'a> {
    service: Service,
    status: bool,
    message: &'a str,
    timestamp: DateTime<Utc>,
    all_services: &'a ServiceStatusMap,
}

/// Generic webhook channel.
pub struct WebhookAlert {
    client: reqwest::Client,
    url: String,
}

impl WebhookAlert {
    pub fn new(url: impl Into<String>) -> Result<Self, AulaError> {
        Ok(Self {
            client: http_client("webhook")?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl AlertChannel for WebhookAlert {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, event: &AlertEvent) -> Result<(), AulaError> {
        let payload = WebhookPayload {
            service: event.service,
            status: event.status,
            message: &event.message,
            timestamp: event.timestamp,
            all_services: &event.all_services,
        };
        let resp = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| delivery_error(self.name(), e))?;
        check_response(self.name(), resp).await
    }
}

/// Email webhook channel. Down transitions go out with high priority.
pub struct EmailAlert {
    client: reqwest::Client,
    url: String,
}

impl EmailAlert {
    pub fn new(url: impl Into<String>) -> Result<Self, AulaError> {
        Ok(Self {
            client: http_client("email")?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl AlertChannel for EmailAlert {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, event: &AlertEvent) -> Result<(), AulaError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&json!({
                "subject": format!("Aula alert: {}", event.service),
                "body": event.message,
                "priority": if event.status { "normal" } else { "high" },
            }))
            .send()
            .await
            .map_err(|e| delivery_error(self.name(), e))?;
        check_response(self.name(), resp).await
    }
}

/// Fan-out dispatcher over the configured alert channels.
pub struct Notifier {
    channels: Vec<Box<dyn AlertChannel>>,
}

impl Notifier {
    /// Builds the channel list from present configuration. Absent
    /// credentials silently skip that channel; partial Telegram credentials
    /// are rejected earlier by config validation.
    pub fn from_config(config: &AlertsConfig) -> Result<Self, AulaError> {
        let mut channels: Vec<Box<dyn AlertChannel>> = Vec::new();

        if let (Some(token), Some(chat_id)) =
            (&config.telegram_bot_token, &config.telegram_chat_id)
        {
            channels.push(Box::new(TelegramAlert::new(token, chat_id)?));
        }
        if let Some(url) = &config.webhook_url {
            channels.push(Box::new(WebhookAlert::new(url)?));
        }
        if let Some(url) = &config.email_webhook_url {
            channels.push(Box::new(EmailAlert::new(url)?));
        }

        info!(
            telegram = config.telegram_bot_token.is_some(),
            webhook = config.webhook_url.is_some(),
            email = config.email_webhook_url.is_some(),
            "alert channels configured"
        );
        Ok(Self { channels })
    }

    /// Builds a notifier from explicit channel handlers.
    pub fn from_channels(channels: Vec<Box<dyn AlertChannel>>) -> Self {
        Self { channels }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Attempts every channel independently; never fails as a whole.
    pub async fn notify(&self, event: &AlertEvent) {
        for channel in &self.channels {
            match channel.send(event).await {
                Ok(()) => {
                    debug!(channel = channel.name(), service = %event.service, "alert delivered");
                }
                Err(e) => {
                    warn!(channel = channel.name(), error = %e, "alert delivery failed");
                }
            }
        }
    }
}
