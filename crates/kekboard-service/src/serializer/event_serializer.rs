//! Bounded single-consumer event queue.
//!
//! Producers call [`EventSender::submit`], which never waits: a full queue
//! drops the event and logs it. One spawned task dequeues in arrival order
//! and awaits the handler for each event before taking the next. Shutdown
//! closes the queue, drains what is already buffered, and aborts the task
//! if the grace period runs out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kekboard_core::{DomainError, ReactionEvent};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::handler::ReactionHandler;
use crate::services::ServiceError;

/// Queue capacity used when none is configured
pub const DEFAULT_QUEUE_CAPACITY: usize = 128;

/// Why an event was not accepted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("event queue is full")]
    QueueFull,

    #[error("event queue is closed")]
    Closed,
}

/// Counters shared by the senders and the consumer
#[derive(Debug, Default)]
struct Counters {
    accepted: AtomicU64,
    dropped: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
}

/// Snapshot of serializer activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializerStats {
    pub accepted: u64,
    pub dropped: u64,
    pub processed: u64,
    pub failed: u64,
}

impl Counters {
    fn snapshot(&self) -> SerializerStats {
        SerializerStats {
            accepted: self.accepted.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Producer half, cheap to clone
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<ReactionEvent>,
    counters: Arc<Counters>,
}

impl EventSender {
    /// Enqueue an event without waiting
    pub fn submit(&self, event: ReactionEvent) -> Result<(), SubmitError> {
        match self.tx.try_send(event) {
            Ok(()) => {
                self.counters.accepted.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(event)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    kind = %event.kind,
                    channel_id = %event.channel_id(),
                    message_id = %event.message_id(),
                    "Event queue full, dropping event"
                );
                Err(SubmitError::QueueFull)
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    kind = %event.kind,
                    message_id = %event.message_id(),
                    "Event queue closed, dropping event"
                );
                Err(SubmitError::Closed)
            }
        }
    }

    /// Check if the consumer has stopped accepting events
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// How the consumer task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every queued event was handled
    Drained,
    /// The grace period ran out and the task was aborted
    Aborted,
    /// The task panicked
    Panicked,
}

/// Owner handle for the consumer task
#[derive(Debug)]
pub struct SerializerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
    counters: Arc<Counters>,
}

impl SerializerHandle {
    /// Current counters
    pub fn stats(&self) -> SerializerStats {
        self.counters.snapshot()
    }

    /// Stop accepting events and drain the queue within `grace`
    pub async fn shutdown(mut self, grace: Duration) -> ShutdownOutcome {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        let outcome = match tokio::time::timeout(grace, &mut self.join).await {
            Ok(Ok(())) => ShutdownOutcome::Drained,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Event consumer panicked");
                ShutdownOutcome::Panicked
            }
            Err(_) => {
                self.join.abort();
                tracing::warn!(grace_ms = grace.as_millis() as u64, "Event drain timed out, aborting consumer");
                ShutdownOutcome::Aborted
            }
        };

        let stats = self.counters.snapshot();
        tracing::info!(
            outcome = ?outcome,
            accepted = stats.accepted,
            dropped = stats.dropped,
            processed = stats.processed,
            failed = stats.failed,
            "Event serializer stopped"
        );

        outcome
    }
}

/// Spawns the consumer task
pub struct EventSerializer;

impl EventSerializer {
    /// Start a consumer running `handler` over a queue of `capacity` events
    pub fn spawn<H: ReactionHandler>(handler: H, capacity: usize) -> (EventSender, SerializerHandle) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let counters = Arc::new(Counters::default());

        let join = tokio::spawn(run(handler, rx, shutdown_rx, counters.clone()));

        tracing::info!(capacity, "Event serializer started");

        (
            EventSender {
                tx,
                counters: counters.clone(),
            },
            SerializerHandle {
                shutdown_tx: Some(shutdown_tx),
                join,
                counters,
            },
        )
    }
}

async fn run<H: ReactionHandler>(
    handler: H,
    mut rx: mpsc::Receiver<ReactionEvent>,
    mut shutdown_rx: oneshot::Receiver<()>,
    counters: Arc<Counters>,
) {
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown_rx => break,
            next = rx.recv() => match next {
                Some(event) => process(&handler, &event, &counters).await,
                None => {
                    tracing::info!("All event senders dropped, consumer exiting");
                    return;
                }
            },
        }
    }

    rx.close();
    let mut drained = 0u64;
    while let Some(event) = rx.recv().await {
        process(&handler, &event, &counters).await;
        drained += 1;
    }
    tracing::info!(drained, "Event queue drained");
}

async fn process<H: ReactionHandler>(handler: &H, event: &ReactionEvent, counters: &Counters) {
    match handler.handle(event).await {
        Ok(_) => {}
        Err(e @ ServiceError::Domain(DomainError::MessageNotFound(_))) => {
            tracing::debug!(
                message_id = %event.message_id(),
                error = %e,
                "Skipping event for missing message"
            );
        }
        Err(e) => {
            counters.failed.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                kind = %event.kind,
                channel_id = %event.channel_id(),
                message_id = %event.message_id(),
                error = %e,
                "Failed to handle reaction event"
            );
        }
    }
    counters.processed.fetch_add(1, Ordering::Relaxed);
}
