// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Nila companion chat pipeline.
//!
//! This crate provides the error type, the conversation data model, and the
//! adapter traits that the responder, storage, and chat crates build on.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::NilaError;
pub use types::{
    AdapterType, ChatReply, ChatRequest, HealthStatus, Message, MessageId, MessageStatus, Sender,
};

pub use traits::{KeyValueStore, PluginAdapter, ResponderAdapter};
