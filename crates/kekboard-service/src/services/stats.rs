//! Stats service
//!
//! Serves the per-author aggregate over tracked messages. The serialized
//! list is cached under a single key, rebuilt lazily on a miss and dropped
//! after every board mutation.

use std::collections::BTreeMap;

use kekboard_core::{AggregateEntry, Snowflake};
use tracing::{debug, instrument, warn};

use crate::dto::StatsEntry;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Stats service
pub struct StatsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StatsService<'a> {
    /// Create a new StatsService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Serialized stats list, from cache when present
    #[instrument(skip(self))]
    pub async fn read(&self) -> ServiceResult<Vec<u8>> {
        if let Some(bytes) = self.ctx.stats_cache().get()? {
            debug!(bytes = bytes.len(), "Stats cache hit");
            return Ok(bytes);
        }

        let epoch = *self.ctx.stats_epoch().lock();

        let entries: Vec<StatsEntry> = self
            .aggregate()
            .await?
            .into_iter()
            .map(StatsEntry::from)
            .collect();
        let bytes = serde_json::to_vec(&entries)?;

        let current = self.ctx.stats_epoch().lock();
        if *current == epoch {
            if let Err(e) = self.ctx.stats_cache().put(&bytes) {
                warn!(error = %e, "Failed to cache stats");
            }
        } else {
            debug!("Board changed during rebuild, not caching stats");
        }
        drop(current);

        debug!(authors = entries.len(), "Stats rebuilt");
        Ok(bytes)
    }

    /// Per-author totals with resolved display metadata, sorted
    ///
    /// Corrupt records and authors who have left the guild are skipped. Any
    /// other lookup failure aborts the rebuild so a partial list is never
    /// served or cached.
    pub async fn aggregate(&self) -> ServiceResult<Vec<AggregateEntry>> {
        let mut totals: BTreeMap<(Snowflake, Snowflake), u64> = BTreeMap::new();

        for record in self.ctx.board_states().scan_all() {
            match record {
                Ok(state) => {
                    *totals.entry((state.author_id, state.guild_id)).or_default() +=
                        state.reaction_count;
                }
                Err(e) if e.is_corrupt() => {
                    warn!(error = %e, "Skipping corrupt board state");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let mut entries = Vec::with_capacity(totals.len());
        for ((author_id, guild_id), total_count) in totals {
            match self.ctx.chat().fetch_member(guild_id, author_id).await {
                Ok(member) => entries.push(AggregateEntry {
                    author_id,
                    guild_id,
                    username: member.username,
                    avatar: member.avatar_url.unwrap_or_default(),
                    total_count,
                }),
                Err(e) if e.is_not_found() => {
                    debug!(author_id = %author_id, guild_id = %guild_id, "Skipping departed author");
                }
                Err(e) => return Err(e.into()),
            }
        }

        sort_entries(&mut entries);
        Ok(entries)
    }

    /// Drop the cached stats
    pub fn invalidate(&self) -> ServiceResult<()> {
        let mut epoch = self.ctx.stats_epoch().lock();
        *epoch += 1;
        self.ctx.stats_cache().invalidate()?;
        Ok(())
    }
}

/// Highest count first, ties by username
pub fn sort_entries(entries: &mut [AggregateEntry]) {
    entries.sort_by(|a, b| {
        b.total_count
            .cmp(&a.total_count)
            .then_with(|| a.username.cmp(&b.username))
    });
}
