// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the chat backend.

use serde::Deserialize;

/// Successful `POST /chat` body.
///
/// `response` is required; an absent or non-string value is a malformed
/// payload. An empty string is accepted here and judged by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseBody {
    pub response: String,
}

/// Error body as produced by the backend framework (`{"detail": ...}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub detail: serde_json::Value,
}

impl ApiErrorResponse {
    /// Human-readable detail text.
    pub fn detail_text(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
