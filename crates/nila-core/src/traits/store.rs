// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value store trait for local persistence.

use async_trait::async_trait;

use crate::error::NilaError;
use crate::traits::adapter::PluginAdapter;

/// A string key-value store.
///
/// `set` overwrites, so saving the same value twice leaves the store in the
/// same state as saving it once.
#[async_trait]
pub trait KeyValueStore: PluginAdapter {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, NilaError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), NilaError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), NilaError>;
}
