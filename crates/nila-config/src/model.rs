// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Nila configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to the values the mobile app shipped with.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NilaConfig {
    /// Companion identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Remote chat backend settings.
    #[serde(default)]
    pub responder: ResponderConfig,

    /// Crisis keyword guard settings.
    #[serde(default)]
    pub guard: GuardConfig,

    /// Degraded-reply and error-reply wording.
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// Local key-value persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Companion identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the companion.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Opening line shown when a conversation starts empty.
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            greeting: default_greeting(),
        }
    }
}

fn default_agent_name() -> String {
    "Nila".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_greeting() -> String {
    "Hello! I'm Nila, your emotional wellness companion 🌙\n\n\
     I'm here to listen without judgment. How are you feeling today?"
        .to_string()
}

/// Remote chat backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResponderConfig {
    /// Base URL of the chat backend. Requests go to `{endpoint}/chat`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Upper bound on a single reply, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with each request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("nila/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Crisis keyword guard configuration.
///
/// The built-in keyword list is always active; entries here only add to it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    /// Additional phrases that route a message to the safety resources.
    #[serde(default)]
    pub extra_keywords: Vec<String>,
}

/// Wording used when the backend is degraded or unreachable.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FallbackConfig {
    /// Substrings (case-sensitive) that mark a successful reply as degraded.
    #[serde(default = "default_degraded_sentinels")]
    pub degraded_sentinels: Vec<String>,

    /// Supportive stock replies used in place of a degraded reply.
    #[serde(default = "default_canned_replies")]
    pub canned_replies: Vec<String>,

    /// Reply shown, flagged as an error, when the backend cannot be reached.
    #[serde(default = "default_error_reply")]
    pub error_reply: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            degraded_sentinels: default_degraded_sentinels(),
            canned_replies: default_canned_replies(),
            error_reply: default_error_reply(),
        }
    }
}

fn default_degraded_sentinels() -> Vec<String> {
    vec!["sleeping".to_string(), "Error".to_string()]
}

fn default_canned_replies() -> Vec<String> {
    [
        "I hear you, and I'm glad you're sharing with me. How long have you been feeling this way?",
        "That sounds challenging. Remember, it's okay to take things one moment at a time. 🌙",
        "I'm here for you. Would you like to talk more about what's on your mind?",
        "Your feelings are valid. Sometimes just naming what we feel can bring a bit of relief.",
        "Thank you for trusting me with this. Let's take a deep breath together. 💙",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_error_reply() -> String {
    "Nila is sleeping right now (Network Error). Please try again later.".to_string()
}

/// Local persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file backing the key-value store.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Key under which the serialized conversation is stored.
    #[serde(default = "default_history_key")]
    pub history_key: String,

    /// Key under which the device identifier is stored.
    #[serde(default = "default_user_id_key")]
    pub user_id_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            history_key: default_history_key(),
            user_id_key: default_user_id_key(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("nila").join("nila.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("nila.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_history_key() -> String {
    "nila_chat_history".to_string()
}

fn default_user_id_key() -> String {
    "nila_user_id".to_string()
}
