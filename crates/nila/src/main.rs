// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nila - an emotional wellness companion chat.
//!
//! This is the binary entry point. Every outgoing message passes the crisis
//! guard before it reaches the remote responder.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod chat;
mod check;
mod doctor;
mod history;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

/// Nila - an emotional wellness companion chat.
#[derive(Parser, Debug)]
#[command(name = "nila", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the default search path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive chat session (default).
    Chat,
    /// Run the crisis guard on a piece of text and print the verdict.
    Check {
        /// Text to evaluate.
        text: String,
    },
    /// Print the saved conversation.
    History {
        /// Delete the saved conversation instead of printing it.
        #[arg(long)]
        clear: bool,
    },
    /// Check storage and backend connectivity.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => nila_config::load_and_validate_path(path),
        None => nila_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            nila_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat::run_chat(config).await,
        Commands::Check { text } => {
            check::run_check(&config, &text);
            Ok(())
        }
        Commands::History { clear } => history::run_history(&config, clear).await,
        Commands::Doctor { plain } => doctor::run_doctor(&config, plain).await,
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` takes precedence.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nila={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
