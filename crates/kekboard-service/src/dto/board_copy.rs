//! Board copy mapper
//!
//! Turns a source message and its author into the message posted on the
//! board. The header carries the emoji and live count; the first embed
//! carries the author, the text and a jump link. Image attachments are
//! spread over up to four embeds sharing one URL, which clients render as a
//! single gallery.

use kekboard_core::{
    EmbedAuthor, EmbedField, Member, RenderedEmbed, RenderedMessage, Snowflake, SourceMessage,
};

/// Shared embed URL that groups image embeds into a gallery
pub const GALLERY_URL: &str = "https://twitter.com";

/// Most image embeds a single copy carries
pub const MAX_IMAGE_EMBEDS: usize = 4;

/// Link to a message in the Discord client
pub fn message_url(guild_id: Snowflake, channel_id: Snowflake, message_id: Snowflake) -> String {
    format!("https://discord.com/channels/{guild_id}/{channel_id}/{message_id}")
}

/// Everything needed to render one board copy
#[derive(Debug, Clone, Copy)]
pub struct BoardCopy<'a> {
    pub message: &'a SourceMessage,
    pub author: &'a Member,
    pub guild_id: Snowflake,
    pub count: u64,
    pub emoji: &'a str,
}

impl<'a> BoardCopy<'a> {
    pub fn new(
        message: &'a SourceMessage,
        author: &'a Member,
        guild_id: Snowflake,
        count: u64,
        emoji: &'a str,
    ) -> Self {
        Self {
            message,
            author,
            guild_id,
            count,
            emoji,
        }
    }

    /// Render the outbound message
    pub fn render(&self) -> RenderedMessage {
        RenderedMessage::from(*self)
    }
}

impl From<BoardCopy<'_>> for RenderedMessage {
    fn from(copy: BoardCopy<'_>) -> Self {
        let message = copy.message;

        let mut embeds = vec![RenderedEmbed {
            author: Some(EmbedAuthor {
                name: copy.author.display_name().to_string(),
                icon_url: copy.author.avatar_url.clone(),
            }),
            description: Some(message.content.clone()),
            fields: vec![EmbedField {
                name: "Original".to_string(),
                value: format!(
                    "[Jump!]({})",
                    message_url(copy.guild_id, message.channel_id, message.id)
                ),
            }],
            ..RenderedEmbed::default()
        }];

        for (idx, image) in message.images().take(MAX_IMAGE_EMBEDS).enumerate() {
            if idx == embeds.len() {
                embeds.push(RenderedEmbed::default());
            }
            embeds[idx].url = Some(GALLERY_URL.to_string());
            embeds[idx].image_url = Some(image.url.clone());
        }

        Self {
            content: format!("{} | {}", copy.emoji, copy.count),
            embeds,
        }
    }
}
