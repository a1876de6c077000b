//! Discord REST client behind the chat capability interface.
//!
//! HTTP 404 responses become `ChatError::NotFound`; every other failure is
//! reported as `ChatError::Transport`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use kekboard_core::{
    ChatClient, ChatError, ChatResult, Member, RenderedEmbed, RenderedMessage, Snowflake,
    SourceMessage,
};
use serenity::builder::{CreateEmbed, CreateEmbedAuthor, CreateMessage, EditMessage};
use serenity::http::Http;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};

use super::convert::{member_from, snowflake, source_message_from};

/// Chat client backed by serenity's HTTP client
#[derive(Clone)]
pub struct DiscordChatClient {
    http: Arc<Http>,
}

impl DiscordChatClient {
    /// Create a client sharing an existing HTTP handle
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Create a client for a bot token
    pub fn from_token(token: &str) -> Self {
        Self::new(Arc::new(Http::new(token)))
    }
}

impl fmt::Debug for DiscordChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordChatClient").finish_non_exhaustive()
    }
}

fn map_error(what: impl fmt::Display, err: serenity::Error) -> ChatError {
    if let serenity::Error::Http(http_err) = &err {
        if http_err.status_code().is_some_and(|status| status.as_u16() == 404) {
            return ChatError::not_found(what.to_string());
        }
    }
    ChatError::transport(format!("{what}: {err}"))
}

fn embed(rendered: &RenderedEmbed) -> CreateEmbed {
    let mut embed = CreateEmbed::new();

    if let Some(url) = &rendered.url {
        embed = embed.url(url);
    }
    if let Some(author) = &rendered.author {
        let mut line = CreateEmbedAuthor::new(&author.name);
        if let Some(icon) = &author.icon_url {
            line = line.icon_url(icon);
        }
        embed = embed.author(line);
    }
    if let Some(description) = &rendered.description {
        embed = embed.description(description);
    }
    for field in &rendered.fields {
        embed = embed.field(&field.name, &field.value, false);
    }
    if let Some(image) = &rendered.image_url {
        embed = embed.image(image);
    }

    embed
}

fn embeds(message: &RenderedMessage) -> Vec<CreateEmbed> {
    message.embeds.iter().map(embed).collect()
}

#[async_trait]
impl ChatClient for DiscordChatClient {
    async fn fetch_message(&self, channel_id: Snowflake, message_id: Snowflake) -> ChatResult<SourceMessage> {
        let message = self
            .http
            .get_message(ChannelId::new(channel_id.get()), MessageId::new(message_id.get()))
            .await
            .map_err(|e| map_error(format_args!("message {channel_id}/{message_id}"), e))?;

        Ok(source_message_from(&message))
    }

    async fn fetch_member(&self, guild_id: Snowflake, user_id: Snowflake) -> ChatResult<Member> {
        let member = self
            .http
            .get_member(GuildId::new(guild_id.get()), UserId::new(user_id.get()))
            .await
            .map_err(|e| map_error(format_args!("member {guild_id}/{user_id}"), e))?;

        Ok(member_from(&member))
    }

    async fn send_message(&self, channel_id: Snowflake, message: &RenderedMessage) -> ChatResult<Snowflake> {
        let builder = CreateMessage::new()
            .content(&message.content)
            .embeds(embeds(message));

        let sent = ChannelId::new(channel_id.get())
            .send_message(&self.http, builder)
            .await
            .map_err(|e| map_error(format_args!("channel {channel_id}"), e))?;

        Ok(snowflake(sent.id))
    }

    async fn edit_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        message: &RenderedMessage,
    ) -> ChatResult<()> {
        let builder = EditMessage::new()
            .content(&message.content)
            .embeds(embeds(message));

        ChannelId::new(channel_id.get())
            .edit_message(&self.http, MessageId::new(message_id.get()), builder)
            .await
            .map_err(|e| map_error(format_args!("message {channel_id}/{message_id}"), e))?;

        Ok(())
    }

    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> ChatResult<()> {
        ChannelId::new(channel_id.get())
            .delete_message(&self.http, MessageId::new(message_id.get()))
            .await
            .map_err(|e| map_error(format_args!("message {channel_id}/{message_id}"), e))
    }
}
