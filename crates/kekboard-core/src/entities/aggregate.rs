//! Aggregate entry - per-author totals over tracked messages

use crate::value_objects::Snowflake;

/// Sum of matching reactions across one author's tracked messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateEntry {
    pub author_id: Snowflake,
    pub guild_id: Snowflake,
    pub username: String,
    pub avatar: String,
    pub total_count: u64,
}
