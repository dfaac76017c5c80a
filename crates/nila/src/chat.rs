// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nila chat` command implementation.
//!
//! Interactive REPL over the message dispatcher. The saved conversation is
//! loaded on start and written back after every send.

use std::sync::Arc;

use colored::Colorize;
use nila_chat::{ChatEvent, Dispatcher, SendResult};
use nila_config::NilaConfig;
use nila_core::error::NilaError;
use nila_core::traits::KeyValueStore;
use nila_core::types::{Message, Sender};
use nila_responder::HttpResponder;
use nila_storage::{SqliteStore, clear_history, get_or_create_user_id, load_history, save_history};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::check::render_safety_resources;

/// Runs the `nila chat` interactive REPL.
pub async fn run_chat(config: NilaConfig) -> Result<(), NilaError> {
    let store = SqliteStore::open(&config.storage.database_path).await?;
    let user_id = get_or_create_user_id(&store, &config.storage.user_id_key).await;
    let history = load_history(&store, &config.storage.history_key).await?;

    let responder = HttpResponder::new(&config.responder)?;
    let dispatcher = Dispatcher::from_config(&config, Arc::new(responder)).with_history(history);
    let mut events = dispatcher.events();
    let mut snapshots = dispatcher.subscribe();
    info!(
        messages = dispatcher.messages().len(),
        reply_timeout_secs = dispatcher.reply_timeout().as_secs(),
        "chat session started"
    );

    let mut rl = DefaultEditor::new()
        .map_err(|e| NilaError::Internal(format!("failed to initialize readline: {e}")))?;

    let name = config.agent.name.as_str();
    println!("{}", name.bold().green());
    println!(
        "Type {} to exit, {} to start over, {} for help.\n",
        "/quit".yellow(),
        "/clear".yellow(),
        "/help".yellow()
    );

    let mut printed = {
        let snap = snapshots.borrow_and_update();
        for message in &snap.messages {
            print_message(name, message);
        }
        snap.messages.len()
    };
    if printed == 0 {
        println!("{} {}\n", format!("{name}:").cyan().bold(), config.agent.greeting);
    }

    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                match trimmed {
                    "/quit" | "/exit" => break,
                    "/help" => {
                        print_help();
                        continue;
                    }
                    "/clear" => {
                        if dispatcher.clear() {
                            persist_clear(&store, &config).await;
                            printed = 0;
                            println!("{}\n", "conversation cleared".dimmed());
                        }
                        continue;
                    }
                    "" => continue,
                    _ => {}
                }

                let _ = rl.add_history_entry(&line);

                let result = dispatcher.send(trimmed, &user_id).await;
                drain_events(&mut events);

                match result {
                    SendResult::GuardTriggered => {
                        println!("\n{}", render_safety_resources());
                    }
                    SendResult::Busy => {
                        println!("{}", "still waiting for a reply".dimmed());
                    }
                    SendResult::Skipped | SendResult::Replied { .. } => {}
                }

                {
                    let snap = snapshots.borrow_and_update();
                    for message in snap.messages.iter().skip(printed) {
                        if message.sender() == Sender::Assistant {
                            print_message(name, message);
                        }
                    }
                    printed = snap.messages.len();
                }

                if matches!(result, SendResult::Replied { .. })
                    && let Err(e) = save_history(
                        &store,
                        &config.storage.history_key,
                        &dispatcher.messages(),
                    )
                    .await
                {
                    warn!(error = %e, "failed to save chat history");
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "take care".dimmed());
    Ok(())
}

fn drain_events(events: &mut tokio::sync::broadcast::Receiver<ChatEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => debug!(event = %event, "chat event"),
            Err(TryRecvError::Lagged(skipped)) => debug!(skipped, "chat events lagged"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

async fn persist_clear(store: &dyn KeyValueStore, config: &NilaConfig) {
    if let Err(e) = clear_history(store, &config.storage.history_key).await {
        warn!(error = %e, "failed to clear saved chat history");
    }
}

fn print_message(name: &str, message: &Message) {
    match message.sender() {
        Sender::User => println!("{} {}", "you:".green().bold(), message.text()),
        Sender::Assistant if message.is_error() => {
            println!("{} {}\n", format!("{name}:").cyan().bold(), message.text().red())
        }
        Sender::Assistant => println!("{} {}\n", format!("{name}:").cyan().bold(), message.text()),
    }
}

fn print_help() {
    println!("  {:<8} leave the chat", "/quit");
    println!("  {:<8} delete this conversation", "/clear");
    println!("  {:<8} show this help\n", "/help");
    println!("{}", render_safety_resources());
}
