// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-zero intervals and paired credentials.

use thiserror::Error;

use crate::model::AulaConfig;

/// A configuration error, either from loading or from semantic validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment failed to load or deserialize the configuration.
    #[error("{0}")]
    Load(#[from] figment::Error),

    /// A loaded value violated a semantic constraint.
    #[error("{message}")]
    Validation { message: String },
}

/// Render configuration errors to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("error: {error}");
    }
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &AulaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.monitor.check_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "monitor.check_interval_secs must be at least 1".to_string(),
        });
    }

    if config.bridge.backfill_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "bridge.backfill_limit must be at least 1".to_string(),
        });
    }

    if config.ingest.api_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "ingest.api_url must not be empty".to_string(),
        });
    }

    if config.monitor.api_health_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "monitor.api_health_url must not be empty".to_string(),
        });
    }

    // A half-configured Telegram channel is an operator mistake, distinct
    // from clean absence (which just disables the channel).
    let token = config.alerts.telegram_bot_token.is_some();
    let chat = config.alerts.telegram_chat_id.is_some();
    if token != chat {
        errors.push(ConfigError::Validation {
            message: "alerts.telegram_bot_token and alerts.telegram_chat_id must be set together"
                .to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AulaConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AulaConfig::default()).is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = AulaConfig::default();
        config.monitor.check_interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e
            .to_string()
            .contains("monitor.check_interval_secs")));
    }

    #[test]
    fn partial_telegram_config_is_rejected() {
        let mut config = AulaConfig::default();
        config.alerts.telegram_bot_token = Some("123:ABC".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("set together"));
    }

    #[test]
    fn complete_telegram_config_is_accepted() {
        let mut config = AulaConfig::default();
        config.alerts.telegram_bot_token = Some("123:ABC".into());
        config.alerts.telegram_chat_id = Some("-100200300".into());
        assert!(validate_config(&config).is_ok());
    }
}
