// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Nila chat pipeline.

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
///
/// The message dispatcher never hands one of these to its caller: responder
/// errors are folded into a failure outcome and rendered as a chat message.
#[derive(Debug, Error)]
pub enum NilaError {
    /// Configuration errors (invalid endpoint, header values, missing fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Key-value store errors (database open, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Remote responder errors (unreachable, non-success status, malformed payload).
    #[error("responder error: {message}")]
    Responder {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// JSON encoding or decoding of stored values failed.
    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
