// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end monitor behavior: probes in, transition alerts out.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use aula_core::AulaError;
use aula_monitor::{
    AlertChannel, AlertEvent, HealthMonitor, LivenessProbe, Notifier, Service, ServiceStatusMap,
};

/// Probe returning a switchable value.
struct StaticProbe {
    service: Service,
    up: Arc<AtomicBool>,
}

impl StaticProbe {
    fn new(service: Service, up: bool) -> (Self, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(up));
        (
            Self {
                service,
                up: Arc::clone(&flag),
            },
            flag,
        )
    }
}

#[async_trait]
impl LivenessProbe for StaticProbe {
    fn service(&self) -> Service {
        self.service
    }

    async fn check(&self) -> bool {
        self.up.load(Ordering::SeqCst)
    }
}

/// Channel that records every event it receives.
#[derive(Clone, Default)]
struct CapturingChannel {
    events: Arc<Mutex<Vec<AlertEvent>>>,
}

impl CapturingChannel {
    async fn captured(&self) -> Vec<AlertEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl AlertChannel for CapturingChannel {
    fn name(&self) -> &str {
        "capturing"
    }

    async fn send(&self, event: &AlertEvent) -> Result<(), AulaError> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

/// Channel that always fails.
struct FailingChannel;

#[async_trait]
impl AlertChannel for FailingChannel {
    fn name(&self) -> &str {
        "failing"
    }

    async fn send(&self, _event: &AlertEvent) -> Result<(), AulaError> {
        Err(AulaError::Notify {
            channel: "failing".to_string(),
            message: "simulated outage".to_string(),
        })
    }
}

fn monitor_with(
    probes: Vec<Box<dyn LivenessProbe>>,
    channels: Vec<Box<dyn AlertChannel>>,
) -> HealthMonitor {
    HealthMonitor::from_parts(
        probes,
        Notifier::from_channels(channels),
        Duration::from_secs(60),
    )
}

fn all_three(bridge: bool, api: bool, worker: bool) -> Vec<Box<dyn LivenessProbe>> {
    vec![
        Box::new(StaticProbe::new(Service::Bridge, bridge).0),
        Box::new(StaticProbe::new(Service::Api, api).0),
        Box::new(StaticProbe::new(Service::Worker, worker).0),
    ]
}

#[tokio::test]
async fn single_flip_emits_single_alert() {
    let channel = CapturingChannel::default();
    let monitor = monitor_with(all_three(true, false, true), vec![Box::new(channel.clone())]);

    let prev = ServiceStatusMap {
        bridge: true,
        api: true,
        worker: true,
        last_check: chrono::Utc::now(),
    };
    let next = monitor.poll_once(&prev).await;

    assert!(!next.api);
    let events = channel.captured().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].service, Service::Api);
    assert!(!events[0].status);
}

#[tokio::test]
async fn steady_state_emits_no_alerts() {
    let channel = CapturingChannel::default();
    let monitor = monitor_with(all_three(true, true, true), vec![Box::new(channel.clone())]);

    let prev = ServiceStatusMap {
        bridge: true,
        api: true,
        worker: true,
        last_check: chrono::Utc::now(),
    };
    let next = monitor.poll_once(&prev).await;
    // Another cycle with nothing changed.
    let _ = monitor.poll_once(&next).await;

    assert!(channel.captured().await.is_empty());
}

#[tokio::test]
async fn startup_poll_alerts_for_every_healthy_service() {
    // The initial map says everything is down, so the first poll against a
    // healthy deployment announces all three recoveries.
    let channel = CapturingChannel::default();
    let monitor = monitor_with(all_three(true, true, true), vec![Box::new(channel.clone())]);

    let next = monitor.poll_once(&ServiceStatusMap::startup()).await;

    assert!(next.bridge && next.api && next.worker);
    let events = channel.captured().await;
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.status));
}

#[tokio::test]
async fn failing_channel_does_not_block_the_working_one() {
    let channel = CapturingChannel::default();
    let monitor = monitor_with(
        all_three(false, true, true),
        vec![Box::new(FailingChannel), Box::new(channel.clone())],
    );

    let prev = ServiceStatusMap {
        bridge: true,
        api: true,
        worker: true,
        last_check: chrono::Utc::now(),
    };
    let _ = monitor.poll_once(&prev).await;

    let events = channel.captured().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].service, Service::Bridge);
}

#[tokio::test]
async fn recovery_alert_renders_conectado_with_full_snapshot() {
    let channel = CapturingChannel::default();
    let (api_probe, api_flag) = StaticProbe::new(Service::Api, false);
    let monitor = monitor_with(
        vec![
            Box::new(StaticProbe::new(Service::Bridge, true).0),
            Box::new(api_probe),
            Box::new(StaticProbe::new(Service::Worker, true).0),
        ],
        vec![Box::new(channel.clone())],
    );

    let prev = ServiceStatusMap {
        bridge: true,
        api: false,
        worker: true,
        last_check: chrono::Utc::now(),
    };
    api_flag.store(true, Ordering::SeqCst);
    let _ = monitor.poll_once(&prev).await;

    let events = channel.captured().await;
    assert_eq!(events.len(), 1);
    let message = &events[0].message;
    assert!(message.contains("Estado: CONECTADO"));
    assert!(message.contains("WhatsApp Bridge: OK"));
    assert!(message.contains("RAG API: OK"));
    assert!(message.contains("Embedding Worker: OK"));
    assert!(events[0].all_services.api);
}

#[tokio::test]
async fn flip_both_ways_across_cycles() {
    let channel = CapturingChannel::default();
    let (worker_probe, worker_flag) = StaticProbe::new(Service::Worker, true);
    let monitor = monitor_with(
        vec![
            Box::new(StaticProbe::new(Service::Bridge, true).0),
            Box::new(StaticProbe::new(Service::Api, true).0),
            Box::new(worker_probe),
        ],
        vec![Box::new(channel.clone())],
    );

    let mut status = ServiceStatusMap {
        bridge: true,
        api: true,
        worker: true,
        last_check: chrono::Utc::now(),
    };

    worker_flag.store(false, Ordering::SeqCst);
    status = monitor.poll_once(&status).await;
    worker_flag.store(true, Ordering::SeqCst);
    status = monitor.poll_once(&status).await;
    assert!(status.worker);

    let events = channel.captured().await;
    assert_eq!(events.len(), 2);
    assert!(!events[0].status);
    assert!(events[1].status);
    assert!(events.iter().all(|e| e.service == Service::Worker));
}
