// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic health polling with transition-only alerting.

use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::info;

use aula_config::model::{AlertsConfig, MonitorConfig};
use aula_core::AulaError;

use crate::alert::{AlertEvent, Notifier};
use crate::probe::{ApiHealthProbe, LivenessProbe, SessionMarkerProbe, WorkerLogProbe};
use crate::status::ServiceStatusMap;

/// Runs liveness probes on a fixed interval and fans out alerts on
/// status transitions.
pub struct HealthMonitor {
    probes: Vec<Box<dyn LivenessProbe>>,
    notifier: Notifier,
    interval: Duration,
}

impl HealthMonitor {
    /// Builds the standard three-probe monitor from configuration.
    pub fn new(monitor: &MonitorConfig, alerts: &AlertsConfig) -> Result<Self, AulaError> {
        let probes: Vec<Box<dyn LivenessProbe>> = vec![
            Box::new(SessionMarkerProbe::new(
                &monitor.session_marker_path,
                Duration::from_secs(monitor.session_stale_secs),
            )),
            Box::new(ApiHealthProbe::new(&monitor.api_health_url)?),
            Box::new(WorkerLogProbe::new(
                &monitor.worker_log_path,
                Duration::from_secs(monitor.worker_stale_secs),
            )),
        ];
        Ok(Self {
            probes,
            notifier: Notifier::from_config(alerts)?,
            interval: Duration::from_secs(monitor.check_interval_secs),
        })
    }

    /// Assembles a monitor from explicit parts.
    pub fn from_parts(
        probes: Vec<Box<dyn LivenessProbe>>,
        notifier: Notifier,
        interval: Duration,
    ) -> Self {
        Self {
            probes,
            notifier,
            interval,
        }
    }

    /// Runs every probe once, alerts on each transition relative to `prev`,
    /// and returns the new status map.
    pub async fn poll_once(&self, prev: &ServiceStatusMap) -> ServiceStatusMap {
        let mut next = *prev;
        next.last_check = Utc::now();
        for probe in &self.probes {
            let up = probe.check().await;
            next.set(probe.service(), up);
        }

        info!(
            bridge = next.bridge,
            api = next.api,
            worker = next.worker,
            "health check complete"
        );

        for (service, status) in prev.transitions(&next) {
            let event = AlertEvent::transition(service, status, &next);
            info!(service = %service, up = status, "service status changed");
            self.notifier.notify(&event).await;
        }

        next
    }

    /// Polls until cancellation. The first poll runs immediately, so startup
    /// failures alert on the first cycle rather than after one interval.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            channels = self.notifier.channel_count(),
            "health monitor started"
        );

        let mut status = ServiceStatusMap::startup();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("health monitor stopping");
                    return;
                }
                _ = ticker.tick() => {
                    status = self.poll_once(&status).await;
                }
            }
        }
    }
}
