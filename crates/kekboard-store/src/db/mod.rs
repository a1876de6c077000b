//! Embedded key-value store module.
//!
//! Provides the process-wide sled handle shared by every store.

mod sled_db;

pub use sled_db::{KvConfig, KvStore, StoreError, StoreResult};
