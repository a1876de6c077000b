//! Per-event handler run by the serializer's consumer

use std::sync::Arc;

use async_trait::async_trait;
use kekboard_core::{BoardAction, ReactionEvent};

use crate::services::{BoardSyncService, ServiceContext, ServiceResult};

/// Handles one dequeued event at a time
#[async_trait]
pub trait ReactionHandler: Send + Sync + 'static {
    async fn handle(&self, event: &ReactionEvent) -> ServiceResult<BoardAction>;
}

/// Runs the board sync for each event
#[derive(Debug, Clone)]
pub struct SyncWorker {
    ctx: Arc<ServiceContext>,
}

impl SyncWorker {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ReactionHandler for SyncWorker {
    async fn handle(&self, event: &ReactionEvent) -> ServiceResult<BoardAction> {
        BoardSyncService::new(&self.ctx).handle(event).await
    }
}
