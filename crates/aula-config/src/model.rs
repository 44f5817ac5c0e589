// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Aula bridge.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Aula configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AulaConfig {
    /// Session lifecycle and backfill settings.
    #[serde(default)]
    pub bridge: BridgeConfig,

    /// WhatsApp sidecar process settings.
    #[serde(default)]
    pub whatsapp: WhatsappConfig,

    /// Downstream ingestion API settings.
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Health monitor settings.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Alert channel settings. Each channel is independently optional.
    #[serde(default)]
    pub alerts: AlertsConfig,
}

/// Session lifecycle and backfill configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Group display names to monitor, matched as case-insensitive substrings
    /// against the chat list at session start.
    #[serde(default = "default_target_groups")]
    pub target_groups: Vec<String>,

    /// Maximum number of historical messages fetched per group during backfill.
    #[serde(default = "default_backfill_limit")]
    pub backfill_limit: usize,

    /// Backfill day window: messages older than this are skipped.
    #[serde(default = "default_backfill_max_age_days")]
    pub backfill_max_age_days: u64,

    /// Pacing delay between backfilled messages, in milliseconds.
    #[serde(default = "default_backfill_pace_ms")]
    pub backfill_pace_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            target_groups: default_target_groups(),
            backfill_limit: default_backfill_limit(),
            backfill_max_age_days: default_backfill_max_age_days(),
            backfill_pace_ms: default_backfill_pace_ms(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_target_groups() -> Vec<String> {
    vec![
        "Metalurgia UNSAAC 2025".to_string(),
        "CF Metalurgia - Académico".to_string(),
        "Dudas Metalurgia".to_string(),
    ]
}

fn default_backfill_limit() -> usize {
    50
}

fn default_backfill_max_age_days() -> u64 {
    7
}

fn default_backfill_pace_ms() -> u64 {
    100
}

/// WhatsApp sidecar process configuration.
///
/// The sidecar owns the actual WhatsApp transport (QR pairing, browser
/// automation) and speaks newline-delimited JSON on stdio.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsappConfig {
    /// Sidecar executable.
    #[serde(default = "default_sidecar_command")]
    pub command: String,

    /// Arguments passed to the sidecar executable.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for WhatsappConfig {
    fn default() -> Self {
        Self {
            command: default_sidecar_command(),
            args: Vec::new(),
        }
    }
}

fn default_sidecar_command() -> String {
    "wweb-bridge".to_string()
}

/// Downstream ingestion API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IngestConfig {
    /// Full URL of the message-ingestion endpoint.
    #[serde(default = "default_ingest_url")]
    pub api_url: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            api_url: default_ingest_url(),
        }
    }
}

fn default_ingest_url() -> String {
    "http://localhost:8000/ingest/messages".to_string()
}

/// Health monitor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Poll interval in seconds.
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,

    /// Path whose modification time marks bridge session activity.
    #[serde(default = "default_session_marker_path")]
    pub session_marker_path: String,

    /// Maximum session-marker age, in seconds, to count the bridge as live.
    #[serde(default = "default_session_stale_secs")]
    pub session_stale_secs: u64,

    /// Health endpoint of the downstream ingestion API.
    #[serde(default = "default_api_health_url")]
    pub api_health_url: String,

    /// Path whose modification time marks embedding-worker activity.
    #[serde(default = "default_worker_log_path")]
    pub worker_log_path: String,

    /// Maximum worker-log age, in seconds, to count the worker as live.
    #[serde(default = "default_worker_stale_secs")]
    pub worker_stale_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval_secs(),
            session_marker_path: default_session_marker_path(),
            session_stale_secs: default_session_stale_secs(),
            api_health_url: default_api_health_url(),
            worker_log_path: default_worker_log_path(),
            worker_stale_secs: default_worker_stale_secs(),
        }
    }
}

fn default_check_interval_secs() -> u64 {
    60
}

fn default_session_marker_path() -> String {
    "./whatsapp_session".to_string()
}

fn default_session_stale_secs() -> u64 {
    300 // 5 minutes
}

fn default_api_health_url() -> String {
    "http://localhost:8000/health".to_string()
}

fn default_worker_log_path() -> String {
    "./worker.log".to_string()
}

fn default_worker_stale_secs() -> u64 {
    600 // 10 minutes
}

/// Alert channel configuration.
///
/// Every field is optional; an absent credential silently disables that
/// channel only.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AlertsConfig {
    /// Telegram Bot API token. `None` disables the Telegram channel.
    #[serde(default)]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat that receives alerts.
    #[serde(default)]
    pub telegram_chat_id: Option<String>,

    /// Generic webhook URL. `None` disables the webhook channel.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Email webhook URL. `None` disables the email channel.
    #[serde(default)]
    pub email_webhook_url: Option<String>,
}
