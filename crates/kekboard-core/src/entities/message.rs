//! Source message entity - the live message being reacted to

use crate::value_objects::Snowflake;

/// A message as fetched from the chat platform at decision time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMessage {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub attachments: Vec<Attachment>,
    pub reactions: Vec<ReactionCount>,
}

impl SourceMessage {
    /// Create a message without attachments or reactions
    pub fn new(id: Snowflake, channel_id: Snowflake, author_id: Snowflake, content: String) -> Self {
        Self {
            id,
            channel_id,
            author_id,
            content,
            attachments: Vec::new(),
            reactions: Vec::new(),
        }
    }

    /// Add a reaction count
    #[must_use]
    pub fn with_reaction(mut self, name: impl Into<String>, count: u64) -> Self {
        self.reactions.push(ReactionCount::new(name, count));
        self
    }

    /// Add an attachment
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Iterate over attachments that render as images
    pub fn images(&self) -> impl Iterator<Item = &Attachment> {
        self.attachments.iter().filter(|a| a.is_image())
    }
}

/// File attached to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
    pub content_type: Option<String>,
}

impl Attachment {
    /// Create a new Attachment
    pub fn new(filename: impl Into<String>, url: impl Into<String>, content_type: Option<String>) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
            content_type,
        }
    }

    /// Check if the attachment is an image
    #[inline]
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
    }
}

/// Aggregated reaction count for one emoji on a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionCount {
    /// Emoji name (custom emoji name or the unicode glyph)
    pub name: String,
    pub count: u64,
}

impl ReactionCount {
    /// Create a new ReactionCount
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}
