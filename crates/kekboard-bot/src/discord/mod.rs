//! Discord implementation of the chat client

mod client;
mod convert;

pub use client::DiscordChatClient;
pub use convert::{member_from, reaction_event, reaction_name, snowflake, source_message_from};
