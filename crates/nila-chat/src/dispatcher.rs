// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message dispatcher that owns one conversation.
//!
//! A send goes through: trim -> crisis guard -> append user message ->
//! awaiting reply -> responder call (bounded by a timeout) -> fallback policy
//! -> append assistant message. The conversation and the awaiting-reply flag
//! live in a [`watch`] channel so the presentation layer only ever sees
//! whole snapshots; transitions are also announced on a [`broadcast`]
//! channel of [`ChatEvent`]s.

use std::sync::Arc;
use std::time::Duration;

use nila_config::NilaConfig;
use nila_core::error::NilaError;
use nila_core::traits::ResponderAdapter;
use nila_core::types::{ChatRequest, Message, MessageStatus};
use nila_guard::CrisisKeywordSet;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::fallback::{FallbackPolicy, SendOutcome};

/// Capacity of the event channel. Slow subscribers lag rather than block sends.
const EVENT_CAPACITY: usize = 32;

/// Feedback transitions published during a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEvent {
    /// The crisis guard stopped a message. Show safety resources.
    GuardTriggered,
    /// A user message was appended and the responder is being called.
    Sent,
    /// An assistant message with status `ok` was appended.
    Succeeded,
    /// An assistant message with status `error` was appended.
    Failed,
}

impl std::fmt::Display for ChatEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatEvent::GuardTriggered => write!(f, "guard-triggered"),
            ChatEvent::Sent => write!(f, "sent"),
            ChatEvent::Succeeded => write!(f, "succeeded"),
            ChatEvent::Failed => write!(f, "failed"),
        }
    }
}

/// How a call to [`Dispatcher::send`] ended. Never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendResult {
    /// Input was empty after trimming; nothing happened.
    Skipped,
    /// The crisis guard matched; nothing was appended or sent.
    GuardTriggered,
    /// A previous send is still awaiting its reply; nothing was appended.
    Busy,
    /// A user and an assistant message were appended.
    Replied { status: MessageStatus },
}

/// The ordered conversation plus the awaiting-reply flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatSnapshot {
    pub messages: Vec<Message>,
    pub awaiting_reply: bool,
}

/// Owns a conversation and runs the send pipeline against it.
pub struct Dispatcher {
    guard: Arc<CrisisKeywordSet>,
    responder: Arc<dyn ResponderAdapter>,
    fallback: FallbackPolicy,
    reply_timeout: Duration,
    state: watch::Sender<ChatSnapshot>,
    events: broadcast::Sender<ChatEvent>,
}

impl Dispatcher {
    pub fn new(
        guard: Arc<CrisisKeywordSet>,
        responder: Arc<dyn ResponderAdapter>,
        fallback: FallbackPolicy,
        reply_timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(ChatSnapshot::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            guard,
            responder,
            fallback,
            reply_timeout,
            state,
            events,
        }
    }

    /// Builds a dispatcher with guard, fallback and timeout taken from config.
    pub fn from_config(config: &NilaConfig, responder: Arc<dyn ResponderAdapter>) -> Self {
        Self::new(
            Arc::new(CrisisKeywordSet::from_config(&config.guard)),
            responder,
            FallbackPolicy::from_config(&config.fallback),
            Duration::from_secs(config.responder.timeout_secs),
        )
    }

    /// Seeds the conversation with previously saved messages.
    pub fn with_history(self, history: Vec<Message>) -> Self {
        self.state.send_modify(|snap| snap.messages = history);
        self
    }

    pub fn reply_timeout(&self) -> Duration {
        self.reply_timeout
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> ChatSnapshot {
        self.state.borrow().clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.borrow().messages.clone()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.state.borrow().awaiting_reply
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.state.subscribe()
    }

    /// Receiver for feedback events emitted after this call.
    pub fn events(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    /// Empties the conversation. Returns `false` while a reply is outstanding.
    pub fn clear(&self) -> bool {
        let mut cleared = false;
        self.state.send_if_modified(|snap| {
            if snap.awaiting_reply {
                return false;
            }
            cleared = true;
            let changed = !snap.messages.is_empty();
            snap.messages.clear();
            changed
        });
        cleared
    }

    /// Runs one message through the pipeline.
    pub async fn send(&self, raw_text: &str, user_id: &str) -> SendResult {
        let text = raw_text.trim();
        if text.is_empty() {
            debug!("empty input ignored");
            return SendResult::Skipped;
        }

        // Guard before the busy check: a crisis message is never dropped as Busy.
        if let Some(keyword) = self.guard.find_match(text) {
            info!(keyword, "crisis keyword matched, message not sent");
            self.emit(ChatEvent::GuardTriggered);
            return SendResult::GuardTriggered;
        }

        let user_message = Message::user(text);
        let mut accepted = false;
        self.state.send_if_modified(|snap| {
            if snap.awaiting_reply {
                return false;
            }
            snap.messages.push(user_message);
            snap.awaiting_reply = true;
            accepted = true;
            true
        });
        if !accepted {
            debug!("send rejected, still awaiting a reply");
            return SendResult::Busy;
        }

        let pending = PendingReply::new(&self.state);
        self.emit(ChatEvent::Sent);

        let outcome = self.call_responder(text, user_id).await;
        let resolution = self.fallback.resolve(&outcome);
        let status = resolution.status;
        pending.complete(Message::assistant(resolution.text, status));

        self.emit(match status {
            MessageStatus::Ok => ChatEvent::Succeeded,
            MessageStatus::Error => ChatEvent::Failed,
        });
        SendResult::Replied { status }
    }

    async fn call_responder(&self, text: &str, user_id: &str) -> SendOutcome {
        let request = ChatRequest {
            message: text.to_string(),
            user_id: user_id.to_string(),
        };
        match tokio::time::timeout(self.reply_timeout, self.responder.respond(request)).await {
            Err(_) => {
                let err = NilaError::Timeout {
                    duration: self.reply_timeout,
                };
                SendOutcome::RemoteFailure(err.to_string())
            }
            Ok(Err(e)) => SendOutcome::RemoteFailure(e.to_string()),
            Ok(Ok(reply)) if reply.text.trim().is_empty() => SendOutcome::RemoteDegraded(reply.text),
            Ok(Ok(reply)) => SendOutcome::Delivered(reply.text),
        }
    }

    fn emit(&self, event: ChatEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Clears the awaiting-reply flag if a send is dropped before its reply.
struct PendingReply<'a> {
    state: &'a watch::Sender<ChatSnapshot>,
    completed: bool,
}

impl<'a> PendingReply<'a> {
    fn new(state: &'a watch::Sender<ChatSnapshot>) -> Self {
        Self {
            state,
            completed: false,
        }
    }

    /// Appends the assistant message and clears the flag in one snapshot.
    fn complete(mut self, message: Message) {
        self.state.send_modify(|snap| {
            snap.messages.push(message);
            snap.awaiting_reply = false;
        });
        self.completed = true;
    }
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        if !self.completed {
            warn!("send cancelled before reply arrived");
            self.state.send_modify(|snap| snap.awaiting_reply = false);
        }
    }
}
