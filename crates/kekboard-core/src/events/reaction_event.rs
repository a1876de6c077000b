//! Reaction events - the platform notifications that trigger a board sync

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Kind of reaction notification
///
/// All kinds are handled identically; the kind is kept for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactionEventKind {
    Added,
    Removed,
    Cleared,
}

impl fmt::Display for ReactionEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "MESSAGE_REACTION_ADD"),
            Self::Removed => write!(f, "MESSAGE_REACTION_REMOVE"),
            Self::Cleared => write!(f, "MESSAGE_REACTION_REMOVE_ALL"),
        }
    }
}

/// Which message a reaction touched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionDescriptor {
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    /// Absent when all reactions were cleared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji_name: Option<String>,
}

/// A reaction notification scoped to a guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    pub guild_id: Snowflake,
    pub reaction: ReactionDescriptor,
    pub kind: ReactionEventKind,
}

impl ReactionEvent {
    /// A single reaction was added
    pub fn added(guild_id: Snowflake, channel_id: Snowflake, message_id: Snowflake, emoji_name: impl Into<String>) -> Self {
        Self::new(ReactionEventKind::Added, guild_id, channel_id, message_id, Some(emoji_name.into()))
    }

    /// A single reaction was removed
    pub fn removed(guild_id: Snowflake, channel_id: Snowflake, message_id: Snowflake, emoji_name: impl Into<String>) -> Self {
        Self::new(ReactionEventKind::Removed, guild_id, channel_id, message_id, Some(emoji_name.into()))
    }

    /// Every reaction on a message was removed
    pub fn cleared(guild_id: Snowflake, channel_id: Snowflake, message_id: Snowflake) -> Self {
        Self::new(ReactionEventKind::Cleared, guild_id, channel_id, message_id, None)
    }

    /// Event of any kind; `emoji_name` is absent for clears and unnamed emoji
    pub fn new(
        kind: ReactionEventKind,
        guild_id: Snowflake,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji_name: Option<String>,
    ) -> Self {
        Self {
            guild_id,
            reaction: ReactionDescriptor {
                channel_id,
                message_id,
                emoji_name,
            },
            kind,
        }
    }

    #[inline]
    pub fn channel_id(&self) -> Snowflake {
        self.reaction.channel_id
    }

    #[inline]
    pub fn message_id(&self) -> Snowflake {
        self.reaction.message_id
    }
}
