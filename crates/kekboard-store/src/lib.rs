//! # kekboard-store
//!
//! Embedded sled storage for board state records and the stats cache.
//!
//! ## Features
//!
//! - **Key-value store**: one sled database shared by every store
//! - **Board state**: one record per tracked message, keyed `message-{channel}-{message}`
//! - **Stats cache**: the serialized stats response under the `stats` key
//!
//! ## Example
//!
//! ```ignore
//! use kekboard_store::{BoardStateStore, KvConfig, KvStore, StatsCacheStore};
//!
//! let kv = KvStore::open(&KvConfig::default())?;
//! let boards = BoardStateStore::new(kv.clone());
//! let stats = StatsCacheStore::new(kv.clone());
//!
//! boards.put(&state)?;
//! stats.invalidate()?;
//! ```

pub mod board;
pub mod db;
pub mod stats;

pub use board::{BoardStateStore, MESSAGE_PREFIX};
pub use db::{KvConfig, KvStore, StoreError, StoreResult};
pub use stats::{StatsCacheStore, STATS_CACHE_KEY};
