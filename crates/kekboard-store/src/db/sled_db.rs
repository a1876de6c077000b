//! Embedded key-value store using sled.
//!
//! One database is opened per process and shared by the event worker and the
//! HTTP read path. sled handles concurrent access internally; every operation
//! here is a single-key read or write, or a prefix scan.

use std::path::PathBuf;

use kekboard_core::Snowflake;
use serde::{de::DeserializeOwned, Serialize};

/// Store configuration
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Database directory
    pub path: PathBuf,
    /// Discard the database when the handle is dropped (tests)
    pub temporary: bool,
    /// Background flush interval in milliseconds
    pub flush_every_ms: Option<u64>,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("kekboard.db"),
            temporary: false,
            flush_every_ms: Some(500),
        }
    }
}

impl From<&kekboard_common::StorageConfig> for KvConfig {
    fn from(config: &kekboard_common::StorageConfig) -> Self {
        Self {
            path: config.path.clone(),
            ..Self::default()
        }
    }
}

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to open store at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: sled::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt value under key {key}: {source}")]
    CorruptState {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Board state for message {0} has no board message")]
    MissingBoardMessage(Snowflake),
}

impl StoreError {
    /// Check if the stored bytes failed to decode
    #[inline]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::CorruptState { .. })
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Shared handle to the embedded database
#[derive(Clone)]
pub struct KvStore {
    db: sled::Db,
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore")
            .field("entries", &self.db.len())
            .field("recovered", &self.db.was_recovered())
            .finish()
    }
}

impl KvStore {
    /// Open (or create) the database described by `config`
    pub fn open(config: &KvConfig) -> StoreResult<Self> {
        let db = sled::Config::new()
            .path(&config.path)
            .temporary(config.temporary)
            .flush_every_ms(config.flush_every_ms)
            .open()
            .map_err(|source| StoreError::Open {
                path: config.path.display().to_string(),
                source,
            })?;

        tracing::info!(
            path = %config.path.display(),
            recovered = db.was_recovered(),
            entries = db.len(),
            "Store opened"
        );

        Ok(Self { db })
    }

    /// Open a throwaway database that is removed on drop
    pub fn temporary() -> StoreResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Check that the database answers reads
    pub fn health_check(&self) -> StoreResult<()> {
        self.db.first()?;
        Ok(())
    }

    /// Flush dirty pages to disk
    pub async fn flush(&self) -> StoreResult<usize> {
        Ok(self.db.flush_async().await?)
    }

    /// Serialize and store a value
    pub fn set<V: Serialize>(&self, key: &str, value: &V) -> StoreResult<()> {
        let bytes = serde_json::to_vec(value)?;
        self.db.insert(key, bytes)?;
        Ok(())
    }

    /// Get and deserialize a value by key
    pub fn get_value<V: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<V>> {
        match self.db.get(key)? {
            Some(bytes) => decode(key.as_bytes(), &bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Store raw bytes
    pub fn set_raw(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        self.db.insert(key, bytes)?;
        Ok(())
    }

    /// Get raw bytes by key
    pub fn get_raw(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.db.get(key)?.map(|v| v.to_vec()))
    }

    /// Delete a key, returning whether it existed
    pub fn delete(&self, key: &str) -> StoreResult<bool> {
        Ok(self.db.remove(key)?.is_some())
    }

    /// Lazily iterate and deserialize every value under a key prefix, in key order
    pub fn scan_prefix<V: DeserializeOwned>(
        &self,
        prefix: &str,
    ) -> impl Iterator<Item = StoreResult<V>> {
        self.db.scan_prefix(prefix).map(|item| {
            let (key, value) = item?;
            decode(&key, &value)
        })
    }
}

fn decode<V: DeserializeOwned>(key: &[u8], bytes: &[u8]) -> StoreResult<V> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::CorruptState {
        key: String::from_utf8_lossy(key).into_owned(),
        source,
    })
}
