// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local persistence for Nila.
//!
//! [`SqliteStore`] implements [`KeyValueStore`](nila_core::KeyValueStore) on a
//! single `kv` table. The [`history`] module stores the conversation and the
//! device user id on top of any key-value store.

pub mod history;
pub mod sqlite;

pub use history::{
    GUEST_USER_ID, clear_history, get_or_create_user_id, load_history, save_history,
};
pub use sqlite::SqliteStore;
