// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vigila doctor` command implementation.
//!
//! Runs diagnostic checks against the configured database, payment provider
//! and SMTP relay. Nothing is written; a missing database is reported rather
//! than created.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use vigila_config::model::VigilaConfig;
use vigila_core::{HealthStatus, PluginAdapter, VigilaError};
use vigila_email::SmtpNotifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name,
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `vigila doctor` command.
///
/// With `deep`, also runs the SQLite integrity check and reports allocator
/// statistics.
pub async fn run_doctor(config: &VigilaConfig, deep: bool, plain: bool) -> Result<(), VigilaError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let mut results = vec![
        check_config(config),
        check_database(&config.storage.database_path).await,
        check_payments(config).await,
        check_email(config).await,
    ];
    if deep {
        results.push(check_db_integrity(&config.storage.database_path).await);
        results.push(check_memory_baseline());
    }

    println!();
    println!("  vigila doctor");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", format_line(result, use_color));
    }
    println!();

    let issues = results
        .iter()
        .filter(|r| r.status != CheckStatus::Pass)
        .count();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
        if !deep {
            println!("  Run with --deep for detailed diagnostics.");
        }
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

/// The configuration was validated before dispatch; summarise what it selects.
fn check_config(config: &VigilaConfig) -> CheckResult {
    let start = Instant::now();
    CheckResult::new(
        "Configuration",
        CheckStatus::Pass,
        format!(
            "valid (listen {}:{}, edit window {}h)",
            config.server.host, config.server.port, config.booking.confirmed_edit_window_hours
        ),
        start,
    )
}

/// Check the database file exists, opens, and carries the booking schema.
async fn check_database(db_path: &str) -> CheckResult {
    const NAME: &str = "Database";
    let start = Instant::now();

    if !std::path::Path::new(db_path).exists() {
        return CheckResult::new(
            NAME,
            CheckStatus::Warn,
            format!("not found: {db_path} (run `vigila migrate`)"),
            start,
        );
    }

    let conn = match tokio_rusqlite::Connection::open(db_path).await {
        Ok(conn) => conn,
        Err(e) => return CheckResult::new(NAME, CheckStatus::Fail, format!("open failed: {e}"), start),
    };

    let tables = conn
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('users', 'services', 'bookings', 'auth_tokens')",
                [],
                |row| row.get(0),
            )
        })
        .await;

    match tables {
        Ok(4) => CheckResult::new(NAME, CheckStatus::Pass, "connected, schema present", start),
        Ok(_) => CheckResult::new(
            NAME,
            CheckStatus::Warn,
            "schema incomplete (run `vigila migrate`)",
            start,
        ),
        Err(e) => CheckResult::new(NAME, CheckStatus::Fail, format!("query failed: {e}"), start),
    }
}

/// Check the payment API answers. Any HTTP response counts as reachable.
async fn check_payments(config: &VigilaConfig) -> CheckResult {
    const NAME: &str = "Payments API";
    let start = Instant::now();
    let payments = &config.payments;

    if !payments.enabled {
        return CheckResult::new(NAME, CheckStatus::Warn, "disabled (all payments rejected)", start);
    }
    if payments.secret_key.is_none() {
        return CheckResult::new(NAME, CheckStatus::Fail, "no secret key configured", start);
    }

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(payments.timeout_secs))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            return CheckResult::new(NAME, CheckStatus::Fail, format!("HTTP client error: {e}"), start);
        }
    };

    match client.head(&payments.api_base).send().await {
        Ok(_) => CheckResult::new(NAME, CheckStatus::Pass, "reachable", start),
        Err(e) if e.is_timeout() => CheckResult::new(
            NAME,
            CheckStatus::Fail,
            format!("timeout ({}s)", payments.timeout_secs),
            start,
        ),
        Err(e) => CheckResult::new(NAME, CheckStatus::Fail, format!("unreachable: {e}"), start),
    }
}

/// Check the SMTP relay accepts a connection.
async fn check_email(config: &VigilaConfig) -> CheckResult {
    const NAME: &str = "Email";
    let start = Instant::now();

    if !config.email.enabled {
        return CheckResult::new(NAME, CheckStatus::Warn, "disabled (status updates are logged)", start);
    }

    let notifier = match SmtpNotifier::new(&config.email) {
        Ok(n) => n,
        Err(e) => return CheckResult::new(NAME, CheckStatus::Fail, e.to_string(), start),
    };

    match notifier.health_check().await {
        Ok(HealthStatus::Healthy) => CheckResult::new(NAME, CheckStatus::Pass, "relay reachable", start),
        Ok(HealthStatus::Degraded(msg)) => CheckResult::new(NAME, CheckStatus::Warn, msg, start),
        Ok(HealthStatus::Unhealthy(msg)) => CheckResult::new(NAME, CheckStatus::Fail, msg, start),
        Err(e) => CheckResult::new(NAME, CheckStatus::Fail, e.to_string(), start),
    }
}

/// Run `PRAGMA integrity_check` against the database.
async fn check_db_integrity(db_path: &str) -> CheckResult {
    const NAME: &str = "DB integrity";
    let start = Instant::now();

    if !std::path::Path::new(db_path).exists() {
        return CheckResult::new(NAME, CheckStatus::Warn, "database not found (skipped)", start);
    }

    let conn = match tokio_rusqlite::Connection::open(db_path).await {
        Ok(conn) => conn,
        Err(e) => return CheckResult::new(NAME, CheckStatus::Fail, format!("open failed: {e}"), start),
    };

    let rows = conn
        .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
            let mut stmt = conn.prepare("PRAGMA integrity_check")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect()
        })
        .await;

    match rows {
        Ok(rows) if rows.len() == 1 && rows[0] == "ok" => {
            CheckResult::new(NAME, CheckStatus::Pass, "ok", start)
        }
        Ok(rows) => CheckResult::new(
            NAME,
            CheckStatus::Fail,
            format!("{} issue(s) found", rows.len()),
            start,
        ),
        Err(e) => CheckResult::new(NAME, CheckStatus::Fail, format!("check failed: {e}"), start),
    }
}

fn check_memory_baseline() -> CheckResult {
    let start = Instant::now();

    #[cfg(not(target_env = "msvc"))]
    {
        let _ = tikv_jemalloc_ctl::epoch::advance();
        let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
        let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
        let allocated_mb = allocated as f64 / (1024.0 * 1024.0);
        let resident_mb = resident as f64 / (1024.0 * 1024.0);
        CheckResult::new(
            "Memory baseline",
            CheckStatus::Pass,
            format!("heap: {allocated_mb:.1} MB, resident: {resident_mb:.1} MB"),
            start,
        )
    }

    #[cfg(target_env = "msvc")]
    {
        CheckResult::new(
            "Memory baseline",
            CheckStatus::Warn,
            "jemalloc not available on MSVC",
            start,
        )
    }
}
