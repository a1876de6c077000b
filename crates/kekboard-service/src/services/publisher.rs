//! Board publisher
//!
//! Applies a decided [`BoardAction`](kekboard_core::BoardAction) through the
//! chat client and records the outcome. State is only written after the
//! external call succeeded, and the stats cache is only dropped after the
//! state write succeeded.

use kekboard_core::{DomainError, Member, MessageBoardState, RenderedMessage, Snowflake, SourceMessage};
use tracing::{info, instrument, warn};

use crate::dto::BoardCopy;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::stats::StatsService;

/// Board publisher
pub struct BoardPublisher<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BoardPublisher<'a> {
    /// Create a new BoardPublisher
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a new copy and start tracking the message
    #[instrument(skip(self, message), fields(channel_id = %message.channel_id, message_id = %message.id))]
    pub async fn publish(
        &self,
        message: &SourceMessage,
        guild_id: Snowflake,
        count: u64,
    ) -> ServiceResult<MessageBoardState> {
        let rendered = self.render(message, guild_id, count).await?;
        let board_channel_id = self.ctx.settings().channel_id();

        let board_message_id = self
            .ctx
            .chat()
            .send_message(board_channel_id, &rendered)
            .await?;

        let state = MessageBoardState::pending(message, guild_id, board_channel_id, count)
            .with_board_message(board_message_id);
        self.record(&state)?;

        info!(
            board_message_id = %board_message_id,
            count,
            "Message published to board"
        );

        Ok(state)
    }

    /// Re-render the existing copy with the new count
    ///
    /// A copy that was deleted out from under us is posted again.
    #[instrument(skip(self, message, state), fields(channel_id = %message.channel_id, message_id = %message.id))]
    pub async fn update(
        &self,
        message: &SourceMessage,
        state: MessageBoardState,
        count: u64,
    ) -> ServiceResult<MessageBoardState> {
        let rendered = self.render(message, state.guild_id, count).await?;

        let edited = match state.board_message_id {
            Some(id) => match self
                .ctx
                .chat()
                .edit_message(state.board_channel_id, id, &rendered)
                .await
            {
                Ok(()) => Some(id),
                Err(e) if e.is_not_found() => {
                    warn!(board_message_id = %id, "Board copy missing, republishing");
                    None
                }
                Err(e) => return Err(e.into()),
            },
            None => None,
        };

        let mut updated = state.with_reaction_count(count);
        let board_message_id = match edited {
            Some(id) => id,
            None => {
                let id = self.repost(&rendered).await?;
                updated.board_channel_id = self.ctx.settings().channel_id();
                id
            }
        };
        let updated = updated.with_board_message(board_message_id);
        self.record(&updated)?;

        info!(
            board_message_id = %board_message_id,
            count,
            "Board copy updated"
        );

        Ok(updated)
    }

    /// Delete the copy and stop tracking the message
    ///
    /// A copy that is already gone still clears the record.
    #[instrument(skip(self, state), fields(channel_id = %state.source_channel_id, message_id = %state.source_message_id))]
    pub async fn retract(&self, state: &MessageBoardState) -> ServiceResult<()> {
        if let Some(board_message_id) = state.board_message_id {
            match self
                .ctx
                .chat()
                .delete_message(state.board_channel_id, board_message_id)
                .await
            {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {
                    warn!(board_message_id = %board_message_id, "Board copy already deleted");
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.ctx
            .board_states()
            .delete(state.source_channel_id, state.source_message_id)?;
        StatsService::new(self.ctx).invalidate()?;

        info!(reaction_count = state.reaction_count, "Message retracted from board");

        Ok(())
    }

    async fn render(
        &self,
        message: &SourceMessage,
        guild_id: Snowflake,
        count: u64,
    ) -> ServiceResult<RenderedMessage> {
        let author = self.author(guild_id, message.author_id).await?;
        let settings = self.ctx.settings();
        Ok(BoardCopy::new(message, &author, guild_id, count, settings.emoji()).render())
    }

    async fn author(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<Member> {
        self.ctx
            .chat()
            .fetch_member(guild_id, user_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ServiceError::from(DomainError::MemberNotFound(user_id))
                } else {
                    e.into()
                }
            })
    }

    async fn repost(&self, rendered: &RenderedMessage) -> ServiceResult<Snowflake> {
        Ok(self
            .ctx
            .chat()
            .send_message(self.ctx.settings().channel_id(), rendered)
            .await?)
    }

    fn record(&self, state: &MessageBoardState) -> ServiceResult<()> {
        self.ctx.board_states().put(state)?;
        StatsService::new(self.ctx).invalidate()
    }
}
