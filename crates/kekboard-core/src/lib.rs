//! # kekboard-core
//!
//! Domain layer containing the board state model, the threshold decision
//! engine, reaction events, and the chat capability interface.
//! This crate has zero dependencies on infrastructure (storage, chat SDK, web framework).

pub mod decision;
pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use decision::{decide, BoardAction, ThresholdPolicy};
pub use entities::{
    AggregateEntry, Attachment, EmbedAuthor, EmbedField, Member, MessageBoardState, ReactionCount,
    RenderedEmbed, RenderedMessage, SourceMessage,
};
pub use error::{ChatError, DomainError};
pub use events::{ReactionDescriptor, ReactionEvent, ReactionEventKind};
pub use traits::{ChatClient, ChatResult};
pub use value_objects::{Snowflake, SnowflakeParseError};
