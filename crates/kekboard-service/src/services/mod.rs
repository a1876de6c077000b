//! Business logic services
//!
//! Every service borrows the shared [`ServiceContext`]; none of them hold
//! state of their own.

pub mod board_sync;
pub mod context;
pub mod error;
pub mod publisher;
pub mod stats;

pub use board_sync::BoardSyncService;
pub use context::{BoardSettings, ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use publisher::BoardPublisher;
pub use stats::StatsService;
