//! Rendered board copy - what gets sent to the board channel

/// Message body for a board copy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedMessage {
    pub content: String,
    pub embeds: Vec<RenderedEmbed>,
}

/// A single embed on a board copy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedEmbed {
    pub url: Option<String>,
    pub author: Option<EmbedAuthor>,
    pub description: Option<String>,
    pub fields: Vec<EmbedField>,
    pub image_url: Option<String>,
}

/// Embed author line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: Option<String>,
}

/// Embed name/value field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}
