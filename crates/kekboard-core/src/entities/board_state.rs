//! Board state entity - the persisted record of a message living on the board

use serde::{Deserialize, Serialize};

use super::message::SourceMessage;
use crate::value_objects::Snowflake;

/// Per-message board state
///
/// A record exists exactly while the source message is on the board. It is
/// keyed by the source message identity, never by the board copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBoardState {
    pub source_channel_id: Snowflake,
    pub source_message_id: Snowflake,
    pub author_id: Snowflake,
    pub guild_id: Snowflake,
    pub board_channel_id: Snowflake,
    /// Copy on the board; `None` only between a publish decision and the send
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_message_id: Option<Snowflake>,
    pub reaction_count: u64,
}

impl MessageBoardState {
    /// Create a not-yet-published state for a source message
    pub fn pending(
        message: &SourceMessage,
        guild_id: Snowflake,
        board_channel_id: Snowflake,
        reaction_count: u64,
    ) -> Self {
        Self {
            source_channel_id: message.channel_id,
            source_message_id: message.id,
            author_id: message.author_id,
            guild_id,
            board_channel_id,
            board_message_id: None,
            reaction_count,
        }
    }

    /// Check whether the board copy has been sent
    #[inline]
    pub fn is_published(&self) -> bool {
        self.board_message_id.is_some_and(|id| !id.is_zero())
    }

    /// Record the board copy identity
    #[must_use]
    pub fn with_board_message(mut self, board_message_id: Snowflake) -> Self {
        self.board_message_id = Some(board_message_id);
        self
    }

    /// Record a new matching-reaction count
    #[must_use]
    pub fn with_reaction_count(mut self, reaction_count: u64) -> Self {
        self.reaction_count = reaction_count;
        self
    }
}
