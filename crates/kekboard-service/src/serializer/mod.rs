//! Event serializer
//!
//! Linearizes reaction notifications from any number of producers onto a
//! single consumer task, so state transitions never race.

mod event_serializer;
mod handler;

pub use event_serializer::{
    EventSender, EventSerializer, SerializerHandle, SerializerStats, ShutdownOutcome, SubmitError,
    DEFAULT_QUEUE_CAPACITY,
};
pub use handler::{ReactionHandler, SyncWorker};
