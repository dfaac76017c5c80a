// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock responder adapter for deterministic testing.
//!
//! `MockResponder` implements `ResponderAdapter` with a scripted queue of
//! replies and failures, and records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use nila_core::NilaError;
use nila_core::traits::{PluginAdapter, ResponderAdapter};
use nila_core::types::{AdapterType, ChatReply, ChatRequest, HealthStatus};

/// One scripted responder outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Answer with this text.
    Text(String),
    /// Fail with a responder error carrying this message.
    Fail(String),
}

/// A mock responder that plays back scripted outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty,
/// a default "mock reply" text is returned.
#[derive(Default)]
pub struct MockResponder {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    delay: Option<Duration>,
}

impl MockResponder {
    /// Create a mock responder with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock responder pre-loaded with text replies.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().map(MockReply::Text).collect())),
            ..Self::default()
        }
    }

    /// Delay every reply by `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a text reply to the end of the queue.
    pub async fn add_reply(&self, text: impl Into<String>) {
        self.replies.lock().await.push_back(MockReply::Text(text.into()));
    }

    /// Add a failure to the end of the queue.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.replies.lock().await.push_back(MockReply::Fail(message.into()));
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of calls received so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    async fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::Text("mock reply".to_string()))
    }
}

#[async_trait]
impl PluginAdapter for MockResponder {
    fn name(&self) -> &str {
        "mock-responder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Responder
    }

    async fn health_check(&self) -> Result<HealthStatus, NilaError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ResponderAdapter for MockResponder {
    async fn respond(&self, request: ChatRequest) -> Result<ChatReply, NilaError> {
        self.requests.lock().await.push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.next_reply().await {
            MockReply::Text(text) => Ok(ChatReply { text }),
            MockReply::Fail(message) => Err(NilaError::Responder {
                message,
                source: None,
            }),
        }
    }
}
