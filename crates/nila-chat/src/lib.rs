// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat send pipeline for Nila.
//!
//! [`Dispatcher`] owns a conversation and gates every outgoing message
//! through the crisis guard before calling the remote responder.
//! [`FallbackPolicy`] decides what the user sees when the responder fails
//! or answers with something unusable.

pub mod dispatcher;
pub mod fallback;

pub use dispatcher::{ChatEvent, ChatSnapshot, Dispatcher, SendResult};
pub use fallback::{FallbackPolicy, IndexSource, Resolution, SendOutcome, ThreadRngIndex};
