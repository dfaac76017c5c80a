// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nila history` command implementation.

use colored::Colorize;
use nila_config::NilaConfig;
use nila_core::error::NilaError;
use nila_core::types::{Message, Sender};
use nila_storage::{SqliteStore, clear_history, load_history};

/// Prints (or with `clear`, deletes) the saved conversation.
pub async fn run_history(config: &NilaConfig, clear: bool) -> Result<(), NilaError> {
    let store = SqliteStore::open(&config.storage.database_path).await?;

    if clear {
        clear_history(&store, &config.storage.history_key).await?;
        println!("{}", "conversation cleared".dimmed());
        return Ok(());
    }

    let messages = load_history(&store, &config.storage.history_key).await?;
    if messages.is_empty() {
        println!("{}", "no saved conversation".dimmed());
        return Ok(());
    }
    for message in &messages {
        println!("{}", format_line(&config.agent.name, message));
    }
    Ok(())
}

fn format_line(name: &str, message: &Message) -> String {
    let when = message.timestamp().format("%Y-%m-%d %H:%M");
    let who = match message.sender() {
        Sender::User => "you",
        Sender::Assistant => name,
    };
    let marker = if message.is_error() { " [error]" } else { "" };
    format!("[{when}] {who}{marker}: {}", message.text())
}
