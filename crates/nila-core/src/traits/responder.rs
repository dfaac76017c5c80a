// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Responder adapter trait for the remote text-generation service.

use async_trait::async_trait;

use crate::error::NilaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatReply, ChatRequest};

/// Adapter for the remote chat backend.
///
/// One call is one attempt: implementations must not retry. Every failure
/// mode (network, status, payload) is reported as an `Err`; the dispatcher
/// decides how the user sees it.
#[async_trait]
pub trait ResponderAdapter: PluginAdapter {
    /// Sends a user message and returns the backend's reply.
    async fn respond(&self, request: ChatRequest) -> Result<ChatReply, NilaError>;
}
