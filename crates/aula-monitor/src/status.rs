// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service status snapshots and transition detection.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};

/// The fixed set of monitored services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
pub enum Service {
    #[strum(serialize = "bridge-liveness")]
    #[serde(rename = "bridge-liveness")]
    Bridge,
    #[strum(serialize = "api-liveness")]
    #[serde(rename = "api-liveness")]
    Api,
    #[strum(serialize = "worker-liveness")]
    #[serde(rename = "worker-liveness")]
    Worker,
}

impl Service {
    pub const ALL: [Service; 3] = [Service::Bridge, Service::Api, Service::Worker];

    /// Operator-facing display name used in alert bodies.
    pub fn display_name(self) -> &'static str {
        match self {
            Service::Bridge => "WhatsApp Bridge",
            Service::Api => "RAG API",
            Service::Worker => "Embedding Worker",
        }
    }
}

/// One poll cycle's snapshot of all service liveness values.
///
/// Exactly one map exists per monitor lifetime, threaded through the poll
/// loop as an owned accumulator and replaced wholesale every cycle, so
/// transition detection always compares the current poll against the map
/// before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceStatusMap {
    #[serde(rename = "bridge-liveness")]
    pub bridge: bool,
    #[serde(rename = "api-liveness")]
    pub api: bool,
    #[serde(rename = "worker-liveness")]
    pub worker: bool,
    pub last_check: DateTime<Utc>,
}

impl ServiceStatusMap {
    /// Initial map: everything down, stamped with the current time.
    pub fn startup() -> Self {
        Self {
            bridge: false,
            api: false,
            worker: false,
            last_check: Utc::now(),
        }
    }

    pub fn get(&self, service: Service) -> bool {
        match service {
            Service::Bridge => self.bridge,
            Service::Api => self.api,
            Service::Worker => self.worker,
        }
    }

    pub fn set(&mut self, service: Service, up: bool) {
        match service {
            Service::Bridge => self.bridge = up,
            Service::Api => self.api = up,
            Service::Worker => self.worker = up,
        }
    }

    /// Services whose liveness differs in `next`, with their new value.
    /// The shared `last_check` timestamp never counts as a transition.
    pub fn transitions(&self, next: &ServiceStatusMap) -> Vec<(Service, bool)> {
        Service::ALL
            .into_iter()
            .filter(|&service| self.get(service) != next.get(service))
            .map(|service| (service, next.get(service)))
            .collect()
    }
}
