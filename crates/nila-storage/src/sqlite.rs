// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed key-value store.
//!
//! All statements run on tokio-rusqlite's single background thread.

use std::path::Path;

use async_trait::async_trait;
use nila_core::error::NilaError;
use nila_core::traits::{KeyValueStore, PluginAdapter};
use nila_core::types::{AdapterType, HealthStatus};
use tracing::{debug, info};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

/// Convert a tokio-rusqlite error into NilaError::Storage.
fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> NilaError {
    NilaError::Storage {
        source: Box::new(e),
    }
}

fn now() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Key-value store on a single SQLite table.
pub struct SqliteStore {
    conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and applies the schema.
    ///
    /// Missing parent directories are created.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, NilaError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| NilaError::Storage {
                source: Box::new(e),
            })?;
        }
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| NilaError::Storage {
                source: Box::new(e),
            })?;
        let store = Self { conn };
        store.initialize(true).await?;
        info!(path = %path.display(), "key-value store opened");
        Ok(store)
    }

    /// Opens a private in-memory database.
    pub async fn open_in_memory() -> Result<Self, NilaError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| NilaError::Storage {
                source: Box::new(e),
            })?;
        let store = Self { conn };
        store.initialize(false).await?;
        Ok(store)
    }

    async fn initialize(&self, wal: bool) -> Result<(), NilaError> {
        self.conn
            .call(move |conn| {
                if wal {
                    conn.pragma_update(None, "journal_mode", "WAL")?;
                }
                conn.execute_batch(SCHEMA)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Number of stored keys.
    pub async fn len(&self) -> Result<usize, NilaError> {
        self.conn
            .call(|conn| {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;
                Ok(count as usize)
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, NilaError> {
        let result = self
            .conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await;
        Ok(match result {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, NilaError> {
        let key = key.to_string();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare_cached("SELECT value FROM kv WHERE key = ?1")?;
                let mut rows = stmt.query(rusqlite::params![key])?;
                match rows.next()? {
                    Some(row) => Ok(Some(row.get(0)?)),
                    None => Ok(None),
                }
            })
            .await
            .map_err(map_tr_err)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), NilaError> {
        let key = key.to_string();
        let value = value.to_string();
        let updated_at = now();
        let len = value.len();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3) \
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value, \
                     updated_at = excluded.updated_at",
                    rusqlite::params![key, value, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(bytes = len, "key stored");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), NilaError> {
        let key = key.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM kv WHERE key = ?1", rusqlite::params![key])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}
