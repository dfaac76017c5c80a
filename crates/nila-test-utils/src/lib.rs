// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Nila integration tests.
//!
//! Provides mock adapters and a test harness for fast, deterministic tests
//! without a running chat backend.
//!
//! # Components
//!
//! - [`MockResponder`] - Mock responder with scripted replies and failures
//! - [`MemoryStore`] - In-memory key-value store
//! - [`TestHarness`] - Dispatcher wired to a mock responder and temp SQLite store

pub mod harness;
pub mod memory_store;
pub mod mock_responder;

pub use harness::TestHarness;
pub use memory_store::MemoryStore;
pub use mock_responder::{MockReply, MockResponder};
