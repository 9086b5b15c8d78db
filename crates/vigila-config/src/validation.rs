// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express. All problems are collected
//! rather than failing on the first one.

use crate::diagnostic::ConfigError;
use crate::model::VigilaConfig;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &VigilaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::validation(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    let api_base = config.payments.api_base.trim();
    if !(api_base.starts_with("https://") || api_base.starts_with("http://")) {
        errors.push(ConfigError::validation(format!(
            "payments.api_base `{api_base}` must be an http(s) URL"
        )));
    }

    if config.payments.timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "payments.timeout_secs must be at least 1",
        ));
    }

    if config.email.enabled {
        if config.email.smtp_host.as_deref().is_none_or(|h| h.trim().is_empty()) {
            errors.push(ConfigError::validation(
                "email.smtp_host is required when email.enabled = true",
            ));
        }
        if config
            .email
            .from_address
            .as_deref()
            .is_none_or(|a| !a.contains('@'))
        {
            errors.push(ConfigError::validation(
                "email.from_address must be a mailbox when email.enabled = true",
            ));
        }
        if config.email.smtp_username.is_some() != config.email.smtp_password.is_some() {
            errors.push(ConfigError::validation(
                "email.smtp_username and email.smtp_password must be set together",
            ));
        }
    }

    if config.booking.confirmed_edit_window_hours < 0 {
        errors.push(ConfigError::validation(format!(
            "booking.confirmed_edit_window_hours must be non-negative, got {}",
            config.booking.confirmed_edit_window_hours
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
