//! Event pipeline tests
//!
//! Feed reaction events through the serializer into the sync worker and
//! check the board once the queue has drained.

use std::time::Duration;

use integration_tests::{added, removed, unique_id, Harness, BOARD_CHANNEL_ID};
use kekboard_service::{EventSerializer, ShutdownOutcome, SyncWorker};

const GRACE: Duration = Duration::from_secs(10);

#[tokio::test]
async fn test_events_drain_into_board() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let published = h.post(70, "alice", 3);
    let ignored = h.post(71, "bob", 1);

    let (sender, handle) = EventSerializer::spawn(SyncWorker::new(h.ctx.clone()), 32);
    sender.submit(added(published))?;
    sender.submit(added(ignored))?;
    sender.submit(removed(ignored))?;

    assert_eq!(handle.shutdown(GRACE).await, ShutdownOutcome::Drained);

    assert!(h.state(published).is_some());
    assert!(h.state(ignored).is_none());
    assert_eq!(h.chat.posted(BOARD_CHANNEL_ID).len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_burst_for_one_message_posts_once() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = h.post(72, "carol", 5);

    let (sender, handle) = EventSerializer::spawn(SyncWorker::new(h.ctx.clone()), 64);
    for _ in 0..20 {
        sender.submit(added(id))?;
    }

    let stats = handle.stats();
    assert_eq!(stats.accepted, 20);
    assert_eq!(handle.shutdown(GRACE).await, ShutdownOutcome::Drained);

    assert_eq!(h.chat.send_count(), 1);
    assert_eq!(h.state(id).map(|s| s.reaction_count), Some(5));

    Ok(())
}

#[tokio::test]
async fn test_concurrent_producers() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let ids: Vec<_> = (0..8).map(|n| h.post(80, "dave", 3 + n)).collect();

    let (sender, handle) = EventSerializer::spawn(SyncWorker::new(h.ctx.clone()), 256);

    let mut producers = Vec::new();
    for id in ids.clone() {
        let sender = sender.clone();
        producers.push(tokio::spawn(async move {
            for _ in 0..5 {
                sender.submit(added(id)).ok();
                tokio::task::yield_now().await;
            }
        }));
    }
    for producer in producers {
        producer.await?;
    }

    assert_eq!(handle.shutdown(GRACE).await, ShutdownOutcome::Drained);

    assert_eq!(h.chat.posted(BOARD_CHANNEL_ID).len(), ids.len());
    for (n, id) in ids.iter().enumerate() {
        assert_eq!(h.state(*id).map(|s| s.reaction_count), Some(3 + n as u64));
    }

    let stats = h.stats().await?;
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].count, (0..8).map(|n| 3 + n).sum::<u64>());

    Ok(())
}

#[tokio::test]
async fn test_missing_message_does_not_count_as_failure() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let present = h.post(90, "erin", 3);

    let (sender, handle) = EventSerializer::spawn(SyncWorker::new(h.ctx.clone()), 8);
    sender.submit(added(unique_id()))?;
    sender.submit(added(present))?;

    // Let the consumer catch up before reading counters
    while handle.stats().processed < 2 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let stats = handle.stats();
    assert_eq!(stats.failed, 0);
    assert_eq!(handle.shutdown(GRACE).await, ShutdownOutcome::Drained);

    assert!(h.state(present).is_some());

    Ok(())
}

#[tokio::test]
async fn test_failures_do_not_stall_queue() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let first = h.post(91, "frank", 3);

    h.chat.set_transport_down(true);
    let (sender, handle) = EventSerializer::spawn(SyncWorker::new(h.ctx.clone()), 8);
    sender.submit(added(first))?;

    while handle.stats().processed < 1 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(handle.stats().failed, 1);
    assert!(h.state(first).is_none());

    // Platform recovers; the next event reconciles
    h.chat.set_transport_down(false);
    sender.submit(added(first))?;
    assert_eq!(handle.shutdown(GRACE).await, ShutdownOutcome::Drained);

    assert!(h.state(first).is_some());

    Ok(())
}
