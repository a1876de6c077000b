//! Conversions between serenity models and domain types

use kekboard_core::{
    Attachment, Member, ReactionCount, ReactionEvent, ReactionEventKind, Snowflake, SourceMessage,
};
use serenity::model::channel::{Message, ReactionType};
use serenity::model::guild::Member as GuildMember;
use serenity::model::id::{ChannelId, GuildId, MessageId};

/// Domain ID from any serenity ID
pub fn snowflake(id: impl Into<u64>) -> Snowflake {
    Snowflake::new(id.into())
}

/// Name a reaction is matched by
///
/// Custom emoji match on their name, unicode emoji on the emoji itself.
pub fn reaction_name(reaction: &ReactionType) -> Option<String> {
    match reaction {
        ReactionType::Custom { name, .. } => name.clone(),
        ReactionType::Unicode(emoji) => Some(emoji.clone()),
        _ => None,
    }
}

/// Domain event for a single reaction on a guild message
pub fn reaction_event(
    kind: ReactionEventKind,
    guild_id: GuildId,
    channel_id: ChannelId,
    message_id: MessageId,
    emoji: &ReactionType,
) -> ReactionEvent {
    ReactionEvent::new(
        kind,
        snowflake(guild_id),
        snowflake(channel_id),
        snowflake(message_id),
        reaction_name(emoji),
    )
}

/// Domain message with its reaction counts
pub fn source_message_from(message: &Message) -> SourceMessage {
    let mut source = SourceMessage::new(
        snowflake(message.id),
        snowflake(message.channel_id),
        snowflake(message.author.id),
        message.content.clone(),
    );

    source.attachments = message
        .attachments
        .iter()
        .map(|a| Attachment::new(a.filename.clone(), a.url.clone(), a.content_type.clone()))
        .collect();

    source.reactions = message
        .reactions
        .iter()
        .filter_map(|r| reaction_name(&r.reaction_type).map(|name| ReactionCount::new(name, r.count)))
        .collect();

    source
}

/// Domain member; the avatar falls back to the default avatar
pub fn member_from(member: &GuildMember) -> Member {
    Member {
        user_id: snowflake(member.user.id),
        username: member.user.name.clone(),
        nick: member.nick.clone(),
        avatar_url: Some(member.user.face()),
    }
}
