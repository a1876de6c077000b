//! Aggregate stats cache.
//!
//! Holds the serialized stats response under a single key. The bytes are
//! opaque here; the service layer builds them and drops them after any
//! board mutation.

use crate::db::{KvStore, StoreResult};

/// Key holding the serialized stats response
pub const STATS_CACHE_KEY: &str = "stats";

/// Store for the cached stats blob
#[derive(Debug, Clone)]
pub struct StatsCacheStore {
    kv: KvStore,
}

impl StatsCacheStore {
    /// Create a new stats cache store
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Cached bytes, if present
    pub fn get(&self) -> StoreResult<Option<Vec<u8>>> {
        self.kv.get_raw(STATS_CACHE_KEY)
    }

    /// Replace the cached bytes
    pub fn put(&self, bytes: &[u8]) -> StoreResult<()> {
        self.kv.set_raw(STATS_CACHE_KEY, bytes)
    }

    /// Drop the cached bytes
    pub fn invalidate(&self) -> StoreResult<()> {
        if self.kv.delete(STATS_CACHE_KEY)? {
            tracing::debug!("Stats cache invalidated");
        }
        Ok(())
    }
}
