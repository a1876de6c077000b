//! Chat capability interface
//!
//! The domain defines what it needs from the chat platform; the binary crate
//! provides the Discord implementation and tests provide an in-memory one.

use async_trait::async_trait;

use crate::entities::{Member, RenderedMessage, SourceMessage};
use crate::error::ChatError;
use crate::value_objects::Snowflake;

/// Result type for chat platform calls
pub type ChatResult<T> = Result<T, ChatError>;

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Fetch a message with its current reactions
    async fn fetch_message(&self, channel_id: Snowflake, message_id: Snowflake) -> ChatResult<SourceMessage>;

    /// Fetch a user's membership in a guild
    async fn fetch_member(&self, guild_id: Snowflake, user_id: Snowflake) -> ChatResult<Member>;

    /// Send a message, returning the new message ID
    async fn send_message(&self, channel_id: Snowflake, message: &RenderedMessage) -> ChatResult<Snowflake>;

    /// Replace the content of an existing message
    async fn edit_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        message: &RenderedMessage,
    ) -> ChatResult<()>;

    /// Delete a message
    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> ChatResult<()>;
}
