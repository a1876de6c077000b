//! Cached aggregate statistics blob

mod stats_cache;

pub use stats_cache::{StatsCacheStore, STATS_CACHE_KEY};
