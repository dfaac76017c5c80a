// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation history and device identity on top of a [`KeyValueStore`].

use nila_core::error::NilaError;
use nila_core::traits::KeyValueStore;
use nila_core::types::Message;
use tracing::{debug, info, warn};

/// User id used when no stored identity can be read or written.
pub const GUEST_USER_ID: &str = "guest_user";

/// Serializes `messages` as a JSON array under `key`.
pub async fn save_history(
    store: &dyn KeyValueStore,
    key: &str,
    messages: &[Message],
) -> Result<(), NilaError> {
    let json = serde_json::to_string(messages)?;
    store.set(key, &json).await?;
    debug!(count = messages.len(), "chat history saved");
    Ok(())
}

/// Loads the conversation saved under `key`.
///
/// A missing key is an empty history. A value that does not decode is
/// treated the same way, with a warning.
pub async fn load_history(store: &dyn KeyValueStore, key: &str) -> Result<Vec<Message>, NilaError> {
    let Some(json) = store.get(key).await? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str::<Vec<Message>>(&json) {
        Ok(messages) => {
            debug!(count = messages.len(), "chat history loaded");
            Ok(messages)
        }
        Err(e) => {
            warn!(error = %e, "stored chat history is corrupt, starting empty");
            Ok(Vec::new())
        }
    }
}

pub async fn clear_history(store: &dyn KeyValueStore, key: &str) -> Result<(), NilaError> {
    store.remove(key).await?;
    info!("chat history cleared");
    Ok(())
}

/// Returns the stored user id, generating and saving one on first use.
///
/// Falls back to [`GUEST_USER_ID`] if the store cannot be read or written.
pub async fn get_or_create_user_id(store: &dyn KeyValueStore, key: &str) -> String {
    match store.get(key).await {
        Ok(Some(id)) if !id.trim().is_empty() => return id,
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "could not read user id, using guest id");
            return GUEST_USER_ID.to_string();
        }
    }

    let id = uuid::Uuid::new_v4().to_string();
    match store.set(key, &id).await {
        Ok(()) => {
            info!("generated new user id");
            id
        }
        Err(e) => {
            warn!(error = %e, "could not save user id, using guest id");
            GUEST_USER_ID.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SqliteStore;
    use async_trait::async_trait;
    use nila_core::traits::PluginAdapter;
    use nila_core::types::{AdapterType, HealthStatus, MessageStatus};

    const KEY: &str = "nila_chat_history";

    /// Store whose every operation fails.
    struct BrokenStore;

    #[async_trait]
    impl PluginAdapter for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }

        fn version(&self) -> semver::Version {
            semver::Version::new(0, 0, 0)
        }

        fn adapter_type(&self) -> AdapterType {
            AdapterType::Storage
        }

        async fn health_check(&self) -> Result<HealthStatus, NilaError> {
            Ok(HealthStatus::Unhealthy("broken".into()))
        }
    }

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, NilaError> {
            Err(NilaError::Internal("unavailable".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), NilaError> {
            Err(NilaError::Internal("unavailable".into()))
        }

        async fn remove(&self, _key: &str) -> Result<(), NilaError> {
            Err(NilaError::Internal("unavailable".into()))
        }
    }

    fn conversation() -> Vec<Message> {
        vec![
            Message::user("hello"),
            Message::assistant("hi there", MessageStatus::Ok),
            Message::user("still there?"),
            Message::assistant("Nila is sleeping", MessageStatus::Error),
        ]
    }

    #[tokio::test]
    async fn history_round_trips_in_order() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let messages = conversation();

        save_history(&store, KEY, &messages).await.unwrap();
        let loaded = load_history(&store, KEY).await.unwrap();

        assert_eq!(loaded, messages);
    }

    #[tokio::test]
    async fn saving_twice_is_idempotent() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let messages = conversation();

        save_history(&store, KEY, &messages).await.unwrap();
        save_history(&store, KEY, &messages).await.unwrap();

        assert_eq!(load_history(&store, KEY).await.unwrap(), messages);
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_history_is_empty() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        assert!(load_history(&store, KEY).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_history_is_empty() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store.set(KEY, "{not json").await.unwrap();
        assert!(load_history(&store, KEY).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_removes_history() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        save_history(&store, KEY, &conversation()).await.unwrap();
        clear_history(&store, KEY).await.unwrap();
        assert!(load_history(&store, KEY).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn user_id_is_generated_once() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let first = get_or_create_user_id(&store, "nila_user_id").await;
        let second = get_or_create_user_id(&store, "nila_user_id").await;

        assert_eq!(first, second);
        assert_ne!(first, GUEST_USER_ID);
        assert!(uuid::Uuid::parse_str(&first).is_ok());
    }

    #[tokio::test]
    async fn broken_store_yields_guest_user() {
        assert_eq!(
            get_or_create_user_id(&BrokenStore, "nila_user_id").await,
            GUEST_USER_ID
        );
        assert!(load_history(&BrokenStore, KEY).await.is_err());
    }
}
