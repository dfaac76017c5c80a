// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fallback policy: turns a responder outcome into the assistant message
//! the user actually sees.

use std::sync::Arc;

use nila_config::model::FallbackConfig;
use nila_core::types::MessageStatus;
use rand::Rng;
use tracing::{debug, warn};

/// Reply used when the canned list is empty.
pub const DEFAULT_CANNED_REPLY: &str = "I hear you.";

/// What came back from one responder call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The responder answered with text.
    Delivered(String),
    /// Network error, timeout, non-success status or malformed payload.
    RemoteFailure(String),
    /// The responder answered, but with nothing usable.
    RemoteDegraded(String),
}

/// Text and status of the assistant message to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub status: MessageStatus,
}

/// Source of uniformly distributed indices for canned-reply selection.
pub trait IndexSource: Send + Sync {
    /// Returns an index in `0..len`. `len` is never zero.
    fn next_index(&self, len: usize) -> usize;
}

/// Default source backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngIndex;

impl IndexSource for ThreadRngIndex {
    fn next_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

impl<F> IndexSource for F
where
    F: Fn(usize) -> usize + Send + Sync,
{
    fn next_index(&self, len: usize) -> usize {
        self(len)
    }
}

/// Decides between the responder's reply, a canned reply, and the error reply.
#[derive(Clone)]
pub struct FallbackPolicy {
    sentinels: Vec<String>,
    canned_replies: Vec<String>,
    error_reply: String,
    index: Arc<dyn IndexSource>,
}

impl std::fmt::Debug for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackPolicy")
            .field("sentinels", &self.sentinels)
            .field("canned_replies", &self.canned_replies.len())
            .field("error_reply", &self.error_reply)
            .finish_non_exhaustive()
    }
}

impl FallbackPolicy {
    /// Builds the policy from the `[fallback]` config section.
    pub fn from_config(config: &FallbackConfig) -> Self {
        Self {
            sentinels: config.degraded_sentinels.clone(),
            canned_replies: config.canned_replies.clone(),
            error_reply: config.error_reply.clone(),
            index: Arc::new(ThreadRngIndex),
        }
    }

    /// Replaces the randomness used for canned-reply selection.
    pub fn with_index_source(mut self, source: impl IndexSource + 'static) -> Self {
        self.index = Arc::new(source);
        self
    }

    pub fn error_reply(&self) -> &str {
        &self.error_reply
    }

    pub fn canned_replies(&self) -> &[String] {
        &self.canned_replies
    }

    /// True when `text` contains one of the degraded sentinels (case-sensitive).
    pub fn is_degraded(&self, text: &str) -> bool {
        self.sentinels
            .iter()
            .any(|s| !s.is_empty() && text.contains(s.as_str()))
    }

    /// Maps an outcome to the assistant message text and status.
    pub fn resolve(&self, outcome: &SendOutcome) -> Resolution {
        match outcome {
            SendOutcome::Delivered(text) if !self.is_degraded(text) => Resolution {
                text: text.clone(),
                status: MessageStatus::Ok,
            },
            SendOutcome::Delivered(_) => {
                debug!("reply matched a degraded sentinel, substituting canned reply");
                self.canned()
            }
            SendOutcome::RemoteDegraded(_) => {
                debug!("responder returned an empty reply, substituting canned reply");
                self.canned()
            }
            SendOutcome::RemoteFailure(reason) => {
                warn!(reason = reason.as_str(), "responder failed, showing error reply");
                Resolution {
                    text: self.error_reply.clone(),
                    status: MessageStatus::Error,
                }
            }
        }
    }

    fn canned(&self) -> Resolution {
        let text = match self.canned_replies.len() {
            0 => DEFAULT_CANNED_REPLY.to_string(),
            len => {
                // Clamp misbehaving sources.
                let idx = self.index.next_index(len) % len;
                self.canned_replies[idx].clone()
            }
        };
        Resolution {
            text,
            status: MessageStatus::Ok,
        }
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::from_config(&FallbackConfig::default())
    }
}
