// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery of accepted messages to the downstream ingestion API.
//!
//! At-most-once, best-effort: any transport failure is logged and swallowed,
//! never retried, and never surfaces into the session controller. Message
//! loss on forwarder failure is an accepted trade-off; downstream ingestion
//! is not mission-critical for the bridge.

use std::time::Duration;

use aula_config::model::IngestConfig;
use aula_core::{AulaError, IngestRecord};
use tracing::{debug, warn};

/// Request timeout for ingest posts.
const FORWARD_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts [`IngestRecord`]s to the ingestion endpoint.
pub struct Forwarder {
    client: reqwest::Client,
    endpoint: String,
}

impl Forwarder {
    /// Creates a forwarder for the configured ingest endpoint.
    pub fn new(config: &IngestConfig) -> Result<Self, AulaError> {
        let client = reqwest::Client::builder()
            .timeout(FORWARD_TIMEOUT)
            .build()
            .map_err(|e| AulaError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.api_url.clone(),
        })
    }

    /// Delivers one record. Transport failures are logged and swallowed;
    /// the response body is ignored, only the status code matters.
    pub async fn forward(&self, record: &IngestRecord) {
        match self.client.post(&self.endpoint).json(record).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(
                    group = record.meta.group_name.as_str(),
                    message_id = record.meta.message_id.as_str(),
                    "message delivered to ingest API"
                );
            }
            Ok(resp) => {
                warn!(
                    status = %resp.status(),
                    message_id = record.meta.message_id.as_str(),
                    "ingest API rejected message"
                );
            }
            Err(e) => {
                warn!(
                    error = %e,
                    message_id = record.meta.message_id.as_str(),
                    "failed to deliver message to ingest API"
                );
            }
        }
    }
}
