//! Serenity event handler.
//!
//! Bridges serenity's callbacks into the bounded event queue. Handlers only
//! enqueue; all board work happens on the serializer's consumer. Events
//! outside a guild are ignored.

use async_trait::async_trait;
use kekboard_core::{ReactionEvent, ReactionEventKind};
use kekboard_service::EventSender;
use serenity::client::{Context, EventHandler};
use serenity::model::channel::Reaction;
use serenity::model::gateway::{GatewayIntents, Ready};
use serenity::model::id::{ChannelId, MessageId};
use tracing::{debug, info, warn};

use crate::discord::{reaction_event, snowflake};

/// Intents the bot needs to see reactions and read message content
pub fn gateway_intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::MESSAGE_CONTENT
}

/// Forwards reaction notifications to the event serializer
#[derive(Debug, Clone)]
pub struct BoardEventHandler {
    events: EventSender,
}

impl BoardEventHandler {
    pub fn new(events: EventSender) -> Self {
        Self { events }
    }

    fn forward(&self, event: ReactionEvent) {
        let kind = event.kind;
        if let Err(e) = self.events.submit(event) {
            debug!(kind = %kind, error = %e, "Reaction event not queued");
        }
    }

    fn forward_single(&self, kind: ReactionEventKind, reaction: &Reaction) {
        let Some(guild_id) = reaction.guild_id else {
            debug!(channel_id = %reaction.channel_id, "Ignoring reaction outside a guild");
            return;
        };
        self.forward(reaction_event(
            kind,
            guild_id,
            reaction.channel_id,
            reaction.message_id,
            &reaction.emoji,
        ));
    }
}

#[async_trait]
impl EventHandler for BoardEventHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            user_id = %ready.user.id,
            guilds = ready.guilds.len(),
            "Logged in"
        );
    }

    async fn reaction_add(&self, _ctx: Context, reaction: Reaction) {
        self.forward_single(ReactionEventKind::Added, &reaction);
    }

    async fn reaction_remove(&self, _ctx: Context, reaction: Reaction) {
        self.forward_single(ReactionEventKind::Removed, &reaction);
    }

    async fn reaction_remove_all(&self, ctx: Context, channel_id: ChannelId, message_id: MessageId) {
        // The payload carries no guild, so resolve it from the channel
        let guild_id = match ctx.http.get_channel(channel_id).await {
            Ok(channel) => match channel.guild() {
                Some(guild_channel) => guild_channel.guild_id,
                None => {
                    debug!(channel_id = %channel_id, "Ignoring reaction clear outside a guild");
                    return;
                }
            },
            Err(e) => {
                warn!(channel_id = %channel_id, error = %e, "Failed to resolve channel for reaction clear");
                return;
            }
        };

        self.forward(ReactionEvent::cleared(
            snowflake(guild_id),
            snowflake(channel_id),
            snowflake(message_id),
        ));
    }
}
