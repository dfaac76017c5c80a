// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nila doctor` command implementation.
//!
//! Runs quick checks against local storage and the chat backend.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use colored::Colorize;
use nila_config::NilaConfig;
use nila_core::error::NilaError;
use nila_core::traits::PluginAdapter;
use nila_core::types::HealthStatus;
use nila_guard::CrisisKeywordSet;
use nila_responder::HttpResponder;
use nila_storage::SqliteStore;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

/// Run the `nila doctor` command. Fails if any check fails.
pub async fn run_doctor(config: &NilaConfig, plain: bool) -> Result<(), NilaError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_guard(config),
        check_database(config).await,
        check_backend(config).await,
    ];

    println!();
    println!("  nila doctor");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", format_result(result, use_color));
    }
    println!();

    let failed = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    if failed > 0 {
        return Err(NilaError::Internal(format!("{failed} check(s) failed")));
    }
    Ok(())
}

fn check_guard(config: &NilaConfig) -> CheckResult {
    let start = Instant::now();
    let keywords = CrisisKeywordSet::from_config(&config.guard);
    CheckResult {
        name: "crisis guard".into(),
        status: CheckStatus::Pass,
        message: format!("{} keywords loaded", keywords.len()),
        duration: start.elapsed(),
    }
}

async fn check_database(config: &NilaConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match SqliteStore::open(&config.storage.database_path).await {
        Ok(store) => from_health(store.health_check().await, &config.storage.database_path),
        Err(e) => (CheckStatus::Fail, e.to_string()),
    };
    CheckResult {
        name: "database".into(),
        status,
        message,
        duration: start.elapsed(),
    }
}

async fn check_backend(config: &NilaConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match HttpResponder::new(&config.responder) {
        Ok(responder) => {
            let (status, message) =
                from_health(responder.health_check().await, responder.endpoint());
            // An unreachable backend only degrades chat to the error reply.
            let status = match status {
                CheckStatus::Fail => CheckStatus::Warn,
                other => other,
            };
            (status, message)
        }
        Err(e) => (CheckStatus::Fail, e.to_string()),
    };
    CheckResult {
        name: "chat backend".into(),
        status,
        message,
        duration: start.elapsed(),
    }
}

fn from_health(health: Result<HealthStatus, NilaError>, target: &str) -> (CheckStatus, String) {
    match health {
        Ok(HealthStatus::Healthy) => (CheckStatus::Pass, target.to_string()),
        Ok(HealthStatus::Degraded(reason)) => (CheckStatus::Warn, reason),
        Ok(HealthStatus::Unhealthy(reason)) => (CheckStatus::Fail, reason),
        Err(e) => (CheckStatus::Fail, e.to_string()),
    }
}

fn format_result(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    let (symbol, message) = match (&result.status, use_color) {
        (CheckStatus::Pass, true) => ("✓".green().to_string(), result.message.normal()),
        (CheckStatus::Warn, true) => ("!".yellow().to_string(), result.message.yellow()),
        (CheckStatus::Fail, true) => ("✗".red().to_string(), result.message.red()),
        (CheckStatus::Pass, false) => ("[OK]  ".to_string(), result.message.normal()),
        (CheckStatus::Warn, false) => ("[WARN]".to_string(), result.message.normal()),
        (CheckStatus::Fail, false) => ("[FAIL]".to_string(), result.message.normal()),
    };
    format!(
        "    {symbol} {:<16} {message} ({duration_ms}ms)",
        result.name
    )
}
