//! Board state records keyed by source message.
//!
//! One JSON record per tracked message under `message-{channel}-{message}`.
//! A record exists only while the message has a live copy on the board.

use crate::db::{KvStore, StoreError, StoreResult};
use kekboard_core::{MessageBoardState, Snowflake};

/// Key prefix for board state records
pub const MESSAGE_PREFIX: &str = "message-";

/// Store for [`MessageBoardState`] records
#[derive(Debug, Clone)]
pub struct BoardStateStore {
    kv: KvStore,
}

impl BoardStateStore {
    /// Create a new board state store
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Key for a source message's record
    pub fn key(channel_id: Snowflake, message_id: Snowflake) -> String {
        format!("{MESSAGE_PREFIX}{channel_id}-{message_id}")
    }

    /// Load the record for a source message
    ///
    /// Returns `StoreError::CorruptState` when the stored bytes do not decode.
    pub fn get(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> StoreResult<Option<MessageBoardState>> {
        self.kv.get_value(&Self::key(channel_id, message_id))
    }

    /// Write a record, replacing any previous one
    pub fn put(&self, state: &MessageBoardState) -> StoreResult<()> {
        if !state.is_published() {
            return Err(StoreError::MissingBoardMessage(state.source_message_id));
        }

        let key = Self::key(state.source_channel_id, state.source_message_id);
        self.kv.set(&key, state)?;

        tracing::debug!(
            key = %key,
            board_message_id = ?state.board_message_id,
            reaction_count = state.reaction_count,
            "Board state stored"
        );
        Ok(())
    }

    /// Remove the record for a source message, returning whether it existed
    pub fn delete(&self, channel_id: Snowflake, message_id: Snowflake) -> StoreResult<bool> {
        self.kv.delete(&Self::key(channel_id, message_id))
    }

    /// Lazily iterate over every stored record
    pub fn scan_all(&self) -> impl Iterator<Item = StoreResult<MessageBoardState>> {
        self.kv.scan_prefix(MESSAGE_PREFIX)
    }
}
