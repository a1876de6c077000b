//! Inbound reaction notifications

mod reaction_event;

pub use reaction_event::{ReactionDescriptor, ReactionEvent, ReactionEventKind};
