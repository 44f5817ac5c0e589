// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `aula monitor` subcommand: periodic liveness polling and alerting.

use tracing::info;

use aula_config::AulaConfig;
use aula_core::AulaError;
use aula_monitor::HealthMonitor;

use crate::shutdown::install_signal_handler;

/// Runs the health monitor until a shutdown signal arrives.
pub async fn run(config: AulaConfig) -> Result<(), AulaError> {
    let monitor = HealthMonitor::new(&config.monitor, &config.alerts)?;

    let cancel = install_signal_handler();
    monitor.run(cancel).await;

    info!("monitor stopped");
    Ok(())
}
