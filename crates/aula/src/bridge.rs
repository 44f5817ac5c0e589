// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `aula bridge` subcommand: WhatsApp session plus ingestion pipeline.

use tracing::info;

use aula_config::AulaConfig;
use aula_core::AulaError;
use aula_ingest::{Forwarder, SessionController};
use aula_wweb::WwebClient;

use crate::shutdown::install_signal_handler;

/// Runs the bridge until a shutdown signal arrives or the session dies.
pub async fn run(config: AulaConfig) -> Result<(), AulaError> {
    info!(
        targets = config.bridge.target_groups.len(),
        ingest = %config.ingest.api_url,
        "starting whatsapp bridge"
    );

    let client = WwebClient::new(config.whatsapp.clone());
    let forwarder = Forwarder::new(&config.ingest)?;
    let mut controller = SessionController::new(client, forwarder, config.bridge);

    let cancel = install_signal_handler();
    controller.run(cancel.clone()).await?;

    // The session loop also returns on terminal disconnect; make sure the
    // signal task stops either way.
    cancel.cancel();
    info!("bridge stopped");
    Ok(())
}
