// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a dispatcher with a mock responder, the
//! configured guard and fallback policy, and a temp SQLite store. It offers
//! `send_message()` to drive the full pipeline and persist the result the
//! same way the chat REPL does.

use std::sync::Arc;
use std::time::Duration;

use nila_chat::{Dispatcher, FallbackPolicy, SendResult};
use nila_config::NilaConfig;
use nila_config::model::StorageConfig;
use nila_core::NilaError;
use nila_core::traits::ResponderAdapter;
use nila_core::types::Message;
use nila_guard::CrisisKeywordSet;
use nila_storage::{SqliteStore, get_or_create_user_id, load_history, save_history};

use crate::mock_responder::MockResponder;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    replies: Vec<String>,
    delay: Option<Duration>,
    reply_timeout: Option<Duration>,
    canned_index: Option<usize>,
    extra_keywords: Vec<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            delay: None,
            reply_timeout: None,
            canned_index: None,
            extra_keywords: Vec::new(),
        }
    }

    /// Set mock responder replies.
    pub fn with_mock_replies(mut self, replies: Vec<String>) -> Self {
        self.replies = replies;
        self
    }

    /// Delay every mock reply.
    pub fn with_responder_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Override the dispatcher reply timeout.
    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = Some(timeout);
        self
    }

    /// Always pick the canned reply at `index`.
    pub fn with_canned_index(mut self, index: usize) -> Self {
        self.canned_index = Some(index);
        self
    }

    /// Add guard keywords on top of the built-in list.
    pub fn with_extra_keywords(mut self, keywords: Vec<String>) -> Self {
        self.extra_keywords = keywords;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, NilaError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| NilaError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = NilaConfig::default();
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            ..StorageConfig::default()
        };
        config.guard.extra_keywords = self.extra_keywords;

        let store = Arc::new(SqliteStore::open(&db_path).await?);

        let mut responder = MockResponder::with_replies(self.replies);
        if let Some(delay) = self.delay {
            responder = responder.with_delay(delay);
        }
        let mock_responder = Arc::new(responder);

        let mut fallback = FallbackPolicy::from_config(&config.fallback);
        if let Some(idx) = self.canned_index {
            fallback = fallback.with_index_source(move |_len: usize| idx);
        }
        let timeout = self
            .reply_timeout
            .unwrap_or(Duration::from_secs(config.responder.timeout_secs));

        let user_id = get_or_create_user_id(store.as_ref(), &config.storage.user_id_key).await;
        let history = load_history(store.as_ref(), &config.storage.history_key).await?;

        let dispatcher = Dispatcher::new(
            Arc::new(CrisisKeywordSet::from_config(&config.guard)),
            mock_responder.clone() as Arc<dyn ResponderAdapter>,
            fallback,
            timeout,
        )
        .with_history(history);

        Ok(TestHarness {
            mock_responder,
            dispatcher,
            store,
            config,
            user_id,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a mock responder and temp storage.
pub struct TestHarness {
    /// The mock responder.
    pub mock_responder: Arc<MockResponder>,
    /// Dispatcher under test.
    pub dispatcher: Dispatcher,
    /// SQLite store (temp DB, cleaned up on drop).
    pub store: Arc<SqliteStore>,
    /// Configuration used to build the stack.
    pub config: NilaConfig,
    /// User id obtained from the store.
    pub user_id: String,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Send a message through the dispatcher and, when it was replied to,
    /// save the resulting history.
    pub async fn send_message(&self, text: &str) -> Result<SendResult, NilaError> {
        let result = self.dispatcher.send(text, &self.user_id).await;
        if matches!(result, SendResult::Replied { .. }) {
            save_history(
                self.store.as_ref(),
                &self.config.storage.history_key,
                &self.dispatcher.messages(),
            )
            .await?;
        }
        Ok(result)
    }

    /// Conversation as currently stored on disk.
    pub async fn stored_history(&self) -> Result<Vec<Message>, NilaError> {
        load_history(self.store.as_ref(), &self.config.storage.history_key).await
    }

    /// Add a reply to the mock responder's queue.
    pub async fn add_responder_reply(&self, text: impl Into<String>) {
        self.mock_responder.add_reply(text).await;
    }

    /// Add a failure to the mock responder's queue.
    pub async fn add_responder_failure(&self, message: impl Into<String>) {
        self.mock_responder.add_failure(message).await;
    }
}
