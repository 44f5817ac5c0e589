// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./aula.toml` > `~/.config/aula/aula.toml` > `/etc/aula/aula.toml`
//! with environment variable overrides via `AULA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::AulaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/aula/aula.toml` (system-wide)
/// 3. `~/.config/aula/aula.toml` (user XDG config)
/// 4. `./aula.toml` (local directory)
/// 5. `AULA_*` environment variables
pub fn load_config() -> Result<AulaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AulaConfig::default()))
        .merge(Toml::file("/etc/aula/aula.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("aula/aula.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("aula.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<AulaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AulaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AulaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AulaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `AULA_ALERTS_TELEGRAM_BOT_TOKEN` must map
/// to `alerts.telegram_bot_token`, not `alerts.telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("AULA_").map(|key| {
        // Figment passes the key in its original case with the prefix stripped;
        // lowercase it here so the section matching below works.
        // Example: AULA_INGEST_API_URL -> "ingest_api_url"
        let key_str = key.as_str().to_ascii_lowercase();
        let key_str = key_str.as_str();
        let mapped = key_str
            .replacen("bridge_", "bridge.", 1)
            .replacen("whatsapp_", "whatsapp.", 1)
            .replacen("ingest_", "ingest.", 1)
            .replacen("monitor_", "monitor.", 1)
            .replacen("alerts_", "alerts.", 1);
        mapped.into()
    })
}
