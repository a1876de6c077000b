//! Board synchronization tests
//!
//! Drive reaction events through the sync service against the in-memory
//! chat platform and check the board, the stored state and the stats.

use integration_tests::{
    added, cleared, image, member, message, open_store, removed, unique_id, Call, Harness,
    BOARD_CHANNEL_ID, SOURCE_CHANNEL_ID,
};
use kekboard_core::{BoardAction, MessageBoardState};
use kekboard_store::BoardStateStore;

// ============================================================================
// Threshold lifecycle
// ============================================================================

#[tokio::test]
async fn test_kek_lifecycle() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = h.post(40, "alice", 2);

    // Below threshold
    assert_eq!(h.react(&added(id)).await?, BoardAction::NoAction);
    assert!(h.state(id).is_none());
    assert!(h.chat.posted(BOARD_CHANNEL_ID).is_empty());

    // Reaches threshold
    h.chat.set_reactions(id, &[("kek", 3)]);
    assert_eq!(h.react(&added(id)).await?, BoardAction::Publish);

    let state = h.state(id).expect("tracked after publish");
    assert_eq!(state.reaction_count, 3);
    assert_eq!(state.author_id.get(), 40);
    assert!(state.is_published());

    let posted = h.chat.posted(BOARD_CHANNEL_ID);
    assert_eq!(posted.len(), 1);
    assert_eq!(Some(posted[0].0), state.board_message_id);
    assert_eq!(posted[0].1.content, "<:kek:77> | 3");

    let stats = h.stats().await?;
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].username, "alice");
    assert_eq!(stats[0].count, 3);

    // Falls back below threshold
    h.chat.set_reactions(id, &[("kek", 2)]);
    assert_eq!(h.react(&removed(id)).await?, BoardAction::Retract);
    assert!(h.state(id).is_none());
    assert!(h.chat.posted(BOARD_CHANNEL_ID).is_empty());
    assert!(h.stats().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_count_change_edits_copy_in_place() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = h.post(41, "bob", 3);

    h.react(&added(id)).await?;
    let published = h.state(id).expect("tracked");

    h.chat.set_reactions(id, &[("kek", 5)]);
    assert_eq!(h.react(&added(id)).await?, BoardAction::Update);

    let updated = h.state(id).expect("still tracked");
    assert_eq!(updated.reaction_count, 5);
    assert_eq!(updated.board_message_id, published.board_message_id);

    let copy = h
        .chat
        .posted_message(BOARD_CHANNEL_ID, updated.board_message_id.expect("published"))
        .expect("copy exists");
    assert_eq!(copy.content, "<:kek:77> | 5");
    assert_eq!(h.chat.send_count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_repeated_event_is_idempotent() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = h.post(42, "carol", 4);

    assert_eq!(h.react(&added(id)).await?, BoardAction::Publish);
    assert_eq!(h.react(&added(id)).await?, BoardAction::NoAction);
    assert_eq!(h.react(&removed(id)).await?, BoardAction::NoAction);

    assert_eq!(h.chat.send_count(), 1);
    assert_eq!(h.chat.calls().len(), 1);
    assert_eq!(h.state(id).map(|s| s.reaction_count), Some(4));

    Ok(())
}

#[tokio::test]
async fn test_clearing_reactions_retracts() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = h.post(43, "dave", 3);
    h.react(&added(id)).await?;

    h.chat.set_reactions(id, &[]);
    assert_eq!(h.react(&cleared(id)).await?, BoardAction::Retract);
    assert!(h.state(id).is_none());

    Ok(())
}

#[tokio::test]
async fn test_matching_reactions_are_summed() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = unique_id();
    h.chat.add_member(member(44, "erin"));
    h.chat.add_message(
        message(id, 44, "two keks")
            .with_reaction("KEKW", 2)
            .with_reaction("kekHeim", 1)
            .with_reaction("thumbsup", 9),
    );

    assert_eq!(h.react(&added(id)).await?, BoardAction::Publish);
    assert_eq!(h.state(id).map(|s| s.reaction_count), Some(3));

    Ok(())
}

#[tokio::test]
async fn test_events_converge_on_live_count() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = h.post(45, "frank", 0);

    // Delivery order does not matter, only the count at handling time
    for (count, event) in [(1, added(id)), (4, removed(id)), (3, added(id)), (6, added(id))] {
        h.chat.set_reactions(id, &[("kek", count)]);
        h.react(&event).await?;
    }

    let state = h.state(id).expect("tracked");
    assert_eq!(state.reaction_count, 6);
    assert_eq!(h.chat.posted(BOARD_CHANNEL_ID).len(), 1);

    Ok(())
}

// ============================================================================
// Rendering
// ============================================================================

#[tokio::test]
async fn test_copy_links_source_and_images() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = unique_id();
    h.chat.add_member(member(46, "grace"));
    h.chat.add_message(
        message(id, 46, "look at this")
            .with_reaction("kek", 3)
            .with_attachment(image("a.png"))
            .with_attachment(image("b.png")),
    );

    h.react(&added(id)).await?;

    let posted = h.chat.posted(BOARD_CHANNEL_ID);
    let copy = &posted[0].1;
    assert_eq!(copy.embeds.len(), 2);

    let first = &copy.embeds[0];
    assert_eq!(first.description.as_deref(), Some("look at this"));
    assert_eq!(first.author.as_ref().map(|a| a.name.as_str()), Some("grace"));
    assert!(first.fields.iter().any(|f| f.value.contains(&format!(
        "https://discord.com/channels/1/{}/{}",
        SOURCE_CHANNEL_ID, id
    ))));
    assert_eq!(
        first.image_url.as_deref(),
        Some("https://cdn.example/files/a.png")
    );
    assert_eq!(
        copy.embeds[1].image_url.as_deref(),
        Some("https://cdn.example/files/b.png")
    );

    Ok(())
}

// ============================================================================
// Platform drift and failures
// ============================================================================

#[tokio::test]
async fn test_missing_copy_is_republished_on_update() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = h.post(47, "heidi", 3);
    h.react(&added(id)).await?;

    let old = h.state(id).and_then(|s| s.board_message_id).expect("published");
    assert!(h.chat.delete_posted(BOARD_CHANNEL_ID, old));

    h.chat.set_reactions(id, &[("kek", 4)]);
    assert_eq!(h.react(&added(id)).await?, BoardAction::Update);

    let state = h.state(id).expect("tracked");
    let new = state.board_message_id.expect("republished");
    assert_ne!(new, old);
    assert_eq!(state.reaction_count, 4);
    assert!(h.chat.posted_message(BOARD_CHANNEL_ID, new).is_some());

    Ok(())
}

#[tokio::test]
async fn test_retract_tolerates_deleted_copy() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = h.post(48, "ivan", 3);
    h.react(&added(id)).await?;

    let copy = h.state(id).and_then(|s| s.board_message_id).expect("published");
    h.chat.delete_posted(BOARD_CHANNEL_ID, copy);

    h.chat.set_reactions(id, &[("kek", 1)]);
    assert_eq!(h.react(&removed(id)).await?, BoardAction::Retract);
    assert!(h.state(id).is_none());

    Ok(())
}

#[tokio::test]
async fn test_transport_failure_leaves_state_untouched() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = h.post(49, "judy", 3);

    h.chat.set_transport_down(true);
    assert!(h.react(&added(id)).await.is_err());
    assert!(h.state(id).is_none());

    // Next event retries against the same live count
    h.chat.set_transport_down(false);
    assert_eq!(h.react(&added(id)).await?, BoardAction::Publish);
    assert!(h.state(id).is_some());

    h.chat.set_transport_down(true);
    h.chat.set_reactions(id, &[("kek", 9)]);
    assert!(h.react(&added(id)).await.is_err());
    assert_eq!(h.state(id).map(|s| s.reaction_count), Some(3));

    Ok(())
}

#[tokio::test]
async fn test_deleted_source_message_is_not_found() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = h.post(50, "mallory", 3);
    h.chat.remove_message(SOURCE_CHANNEL_ID, id);

    let err = h.react(&added(id)).await.expect_err("message is gone");
    assert!(err.is_not_found());
    assert!(h.chat.calls().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_unknown_author_is_not_published() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = h.post(51, "niaj", 3);
    h.chat.remove_member(51);

    let err = h.react(&added(id)).await.expect_err("author is gone");
    assert!(err.is_not_found());
    assert!(h.state(id).is_none());
    assert!(h.chat.posted(BOARD_CHANNEL_ID).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_corrupt_state_is_treated_as_untracked() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = h.post(52, "olivia", 3);

    h.ctx
        .kv()
        .set_raw(&BoardStateStore::key(SOURCE_CHANNEL_ID, id), b"{not json")?;

    assert_eq!(h.react(&added(id)).await?, BoardAction::Publish);
    let state = h.state(id).expect("overwritten with a valid record");
    assert_eq!(state.reaction_count, 3);

    Ok(())
}

// ============================================================================
// Durability
// ============================================================================

#[tokio::test]
async fn test_state_survives_restart() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;

    let (id, chat, published): (_, _, MessageBoardState) = {
        let h = Harness::open(dir.path())?;
        let id = h.post(53, "peggy", 3);
        h.react(&added(id)).await?;
        h.ctx.kv().flush().await?;
        let state = h.state(id).expect("tracked");
        (id, h.chat.clone(), state)
    };

    let h = Harness::with_chat(open_store(dir.path())?, chat);

    assert_eq!(h.state(id), Some(published));

    // Same live count after restart does not post a second copy
    assert_eq!(h.react(&added(id)).await?, BoardAction::NoAction);
    assert_eq!(
        h.chat
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Send { .. }))
            .count(),
        1
    );

    Ok(())
}
