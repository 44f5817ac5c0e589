// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aula - WhatsApp group to knowledge-base bridge.
//!
//! This is the binary entry point. `aula bridge` runs the message pipeline;
//! `aula monitor` runs the deployment health monitor.

mod bridge;
mod monitor;
mod shutdown;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Aula - WhatsApp group to knowledge-base bridge.
#[derive(Parser, Debug)]
#[command(name = "aula", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the WhatsApp session and forward relevant group messages.
    Bridge,
    /// Run the deployment health monitor.
    Monitor,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aula={log_level},warn")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match aula_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            aula_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.bridge.log_level);

    let outcome = match cli.command {
        Some(Commands::Bridge) => bridge::run(config).await,
        Some(Commands::Monitor) => monitor::run(config).await,
        None => {
            println!("aula: use --help for available commands");
            return;
        }
    };

    if let Err(e) = outcome {
        tracing::error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}
