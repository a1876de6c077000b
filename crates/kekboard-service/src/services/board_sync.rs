//! Board sync service
//!
//! Handles one reaction event end to end: fetch the live message, recount
//! the matching reactions, compare against the stored state and apply the
//! resulting action. Events are never patched incrementally, so replays and
//! reordering within a message converge on the live count.

use kekboard_core::{BoardAction, DomainError, MessageBoardState, ReactionEvent, Snowflake};
use tracing::{debug, info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::publisher::BoardPublisher;

/// Board sync service
pub struct BoardSyncService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BoardSyncService<'a> {
    /// Create a new BoardSyncService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Reconcile the board with the message an event refers to
    #[instrument(skip(self, event), fields(kind = %event.kind, channel_id = %event.channel_id(), message_id = %event.message_id()))]
    pub async fn handle(&self, event: &ReactionEvent) -> ServiceResult<BoardAction> {
        let channel_id = event.channel_id();
        let message_id = event.message_id();

        let message = self
            .ctx
            .chat()
            .fetch_message(channel_id, message_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    DomainError::MessageNotFound(message_id).into()
                } else {
                    ServiceError::from(e)
                }
            })?;

        let policy = self.ctx.settings().policy();
        let count = policy.matching_count(&message.reactions);
        let existing = self.load_state(channel_id, message_id)?;
        let action = policy.decide(count, existing.as_ref());

        debug!(
            count,
            stored = ?existing.as_ref().map(|s| s.reaction_count),
            action = %action,
            "Board action decided"
        );

        let publisher = BoardPublisher::new(self.ctx);
        match (action, existing) {
            (BoardAction::NoAction, _) => {}
            (BoardAction::Publish, _) => {
                publisher.publish(&message, event.guild_id, count).await?;
            }
            (BoardAction::Update, Some(state)) => {
                publisher.update(&message, state, count).await?;
            }
            (BoardAction::Retract, Some(state)) => {
                publisher.retract(&state).await?;
            }
            (BoardAction::Update | BoardAction::Retract, None) => {
                return Err(ServiceError::internal(format!(
                    "{action} decided for untracked message {message_id}"
                )));
            }
        }

        if action.is_mutation() {
            info!(action = %action, count, "Board synchronized");
        }

        Ok(action)
    }

    /// Stored state, treating an undecodable record as absent
    fn load_state(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<Option<MessageBoardState>> {
        match self.ctx.board_states().get(channel_id, message_id) {
            Ok(state) => Ok(state),
            Err(e) if e.is_corrupt() => {
                warn!(error = %e, "Corrupt board state, treating as untracked");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
