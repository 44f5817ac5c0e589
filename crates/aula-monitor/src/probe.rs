// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Liveness probes, one per monitored service.
//!
//! Probes return plain booleans and catch their own I/O errors, degrading to
//! `false` instead of propagating. A misbehaving probe must never abort the
//! polling cycle or block the other probes from running.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tracing::debug;

use aula_core::AulaError;

use crate::status::Service;

/// Request timeout for the HTTP health probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// A liveness check producing a boolean for one monitored service.
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    fn service(&self) -> Service;

    /// Runs the check. Implementations must not fail: errors degrade to `false`.
    async fn check(&self) -> bool;
}

/// Bridge liveness: the session-marker path was modified recently.
///
/// The marker is not parsed; only its modification time matters.
pub struct SessionMarkerProbe {
    path: PathBuf,
    max_age: Duration,
}

impl SessionMarkerProbe {
    pub fn new(path: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            path: path.into(),
            max_age,
        }
    }
}

#[async_trait]
impl LivenessProbe for SessionMarkerProbe {
    fn service(&self) -> Service {
        Service::Bridge
    }

    async fn check(&self) -> bool {
        modified_within(&self.path, self.max_age).await
    }
}

/// API liveness: the downstream health endpoint answers 2xx within 5 s.
pub struct ApiHealthProbe {
    client: reqwest::Client,
    url: String,
}

impl ApiHealthProbe {
    pub fn new(url: impl Into<String>) -> Result<Self, AulaError> {
        let client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| AulaError::Internal(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl LivenessProbe for ApiHealthProbe {
    fn service(&self) -> Service {
        Service::Api
    }

    async fn check(&self) -> bool {
        match self.client.get(&self.url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(error = %e, "api health check failed");
                false
            }
        }
    }
}

/// Worker liveness: the worker log path was modified recently.
pub struct WorkerLogProbe {
    path: PathBuf,
    max_age: Duration,
}

impl WorkerLogProbe {
    pub fn new(path: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            path: path.into(),
            max_age,
        }
    }
}

#[async_trait]
impl LivenessProbe for WorkerLogProbe {
    fn service(&self) -> Service {
        Service::Worker
    }

    async fn check(&self) -> bool {
        modified_within(&self.path, self.max_age).await
    }
}

/// True iff `path` exists and its mtime is at most `max_age` old.
/// Any metadata error means the resource is not considered live.
async fn modified_within(path: &Path, max_age: Duration) -> bool {
    let Ok(meta) = tokio::fs::metadata(path).await else {
        return false;
    };
    let Ok(mtime) = meta.modified() else {
        return false;
    };
    match SystemTime::now().duration_since(mtime) {
        Ok(age) => age <= max_age,
        // An mtime slightly in the future (clock skew) counts as fresh.
        Err(_) => true,
    }
}
