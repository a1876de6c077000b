//! # kekboard-service
//!
//! Application layer: the per-event board sync, the board publisher, the
//! stats aggregate, and the bounded event serializer that feeds them.

pub mod dto;
pub mod serializer;
pub mod services;

pub use dto::{BoardCopy, HealthChecks, HealthResponse, ReadinessResponse, StatsEntry};
pub use serializer::{
    EventSender, EventSerializer, ReactionHandler, SerializerHandle, SerializerStats,
    ShutdownOutcome, SubmitError, SyncWorker,
};
pub use services::{
    BoardPublisher, BoardSettings, BoardSyncService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, StatsService,
};
