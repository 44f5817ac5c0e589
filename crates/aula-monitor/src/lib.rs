// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Health monitoring for the aula deployment.
//!
//! Three liveness probes (WhatsApp session marker, ingestion API health
//! endpoint, embedding worker log) run on a fixed interval. Alerts go out
//! only on status transitions, fanned out to every configured channel.

pub mod alert;
pub mod monitor;
pub mod probe;
pub mod status;

pub use alert::{AlertChannel, AlertEvent, EmailAlert, Notifier, TelegramAlert, WebhookAlert};
pub use monitor::HealthMonitor;
pub use probe::{ApiHealthProbe, LivenessProbe, SessionMarkerProbe, WorkerLogProbe};
pub use status::{Service, ServiceStatusMap};
