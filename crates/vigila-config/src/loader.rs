// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vigila.toml` > `~/.config/vigila/vigila.toml` > `/etc/vigila/vigila.toml`
//! with environment variable overrides via `VIGILA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::VigilaConfig;

/// Config sections that env var keys are split on.
const SECTIONS: &[&str] = &["server", "storage", "payments", "email", "booking", "metrics"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vigila/vigila.toml` (system-wide)
/// 3. `~/.config/vigila/vigila.toml` (user XDG config)
/// 4. `./vigila.toml` (local directory)
/// 5. `VIGILA_*` environment variables
pub fn load_config() -> Result<VigilaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<VigilaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VigilaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VigilaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VigilaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(VigilaConfig::default()))
        .merge(Toml::file("/etc/vigila/vigila.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("vigila/vigila.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("vigila.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `VIGILA_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Only the first underscore after a known section name is turned into a dot,
/// so `VIGILA_EMAIL_SMTP_HOST` maps to `email.smtp_host`.
fn env_provider() -> Env {
    Env::prefixed("VIGILA_").map(|key| {
        let key_str = key.as_str();
        let mapped = SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.to_string());
        mapped.into()
    })
}
