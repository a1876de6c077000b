//! Domain entities - core business objects

mod aggregate;
mod board_state;
mod member;
mod message;
mod rendered;

pub use aggregate::AggregateEntry;
pub use board_state::MessageBoardState;
pub use member::Member;
pub use message::{Attachment, ReactionCount, SourceMessage};
pub use rendered::{EmbedAuthor, EmbedField, RenderedEmbed, RenderedMessage};
