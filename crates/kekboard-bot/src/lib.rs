//! # kekboard-bot
//!
//! The bot process: a serenity gateway client feeding reaction events into
//! the board sync serializer, a Discord implementation of the chat client,
//! and the stats HTTP server.

pub mod discord;
pub mod events;
pub mod server;

pub use discord::DiscordChatClient;
pub use events::BoardEventHandler;
pub use server::{create_service_context, run, shutdown_signal};
