//! Stats API integration tests
//!
//! Run a real HTTP server over the harness and read the board statistics
//! the way the dashboard does.

use integration_tests::{added, assert_json, assert_status, removed, Harness, TestServer};
use kekboard_service::StatsEntry;
use reqwest::StatusCode;
use serde_json::Value;

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let server = TestServer::start(&h).await?;

    let response = server.get("/health").await?;
    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = assert_json(response, StatusCode::OK).await?;
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    let body: Value = assert_json(server.get("/health/ready").await?, StatusCode::OK).await?;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["store"], "healthy");

    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_not_found() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let server = TestServer::start(&h).await?;

    assert_status(server.get("/leaderboard").await?, StatusCode::NOT_FOUND).await?;

    Ok(())
}

// ============================================================================
// Stats
// ============================================================================

#[tokio::test]
async fn test_stats_empty() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let server = TestServer::start(&h).await?;

    let response = server.get("/stats").await?;
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    let stats: Vec<StatsEntry> = assert_json(response, StatusCode::OK).await?;
    assert!(stats.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_stats_sorted_by_total() -> anyhow::Result<()> {
    let h = Harness::new()?;

    // alice: 3 + 4, bob: 9, carol: 7 (ties with alice, sorts after by name)
    for (author, name, keks) in [
        (60, "alice", 3),
        (60, "alice", 4),
        (61, "bob", 9),
        (62, "carol", 7),
    ] {
        let id = h.post(author, name, keks);
        h.react(&added(id)).await?;
    }
    // Below threshold, not counted
    let id = h.post(63, "dave", 2);
    h.react(&added(id)).await?;

    let server = TestServer::start(&h).await?;
    let stats: Vec<StatsEntry> = assert_json(server.get("/stats").await?, StatusCode::OK).await?;

    let summary: Vec<(&str, u64)> = stats.iter().map(|s| (s.username.as_str(), s.count)).collect();
    assert_eq!(summary, vec![("bob", 9), ("alice", 7), ("carol", 7)]);
    assert_eq!(stats[0].avatar, "https://cdn.example/avatars/61.png");

    Ok(())
}

#[tokio::test]
async fn test_stats_wire_format() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = h.post(64, "erin", 3);
    h.react(&added(id)).await?;

    let server = TestServer::start(&h).await?;
    let body: Value = assert_json(server.get("/stats").await?, StatusCode::OK).await?;

    assert_eq!(
        body,
        serde_json::json!([
            { "username": "erin", "avatar": "https://cdn.example/avatars/64.png", "count": 3 }
        ])
    );

    Ok(())
}

#[tokio::test]
async fn test_stats_cache_invalidated_by_board_change() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let id = h.post(65, "frank", 3);
    h.react(&added(id)).await?;

    let server = TestServer::start(&h).await?;
    let first: Vec<StatsEntry> = assert_json(server.get("/stats").await?, StatusCode::OK).await?;
    assert_eq!(first[0].count, 3);
    assert!(h.stats_cached());

    h.chat.set_reactions(id, &[("kek", 8)]);
    h.react(&added(id)).await?;
    assert!(!h.stats_cached());

    let second: Vec<StatsEntry> = assert_json(server.get("/stats").await?, StatusCode::OK).await?;
    assert_eq!(second[0].count, 8);

    h.chat.set_reactions(id, &[("kek", 0)]);
    h.react(&removed(id)).await?;
    let third: Vec<StatsEntry> = assert_json(server.get("/stats").await?, StatusCode::OK).await?;
    assert!(third.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_cached_stats_are_served_verbatim() -> anyhow::Result<()> {
    let h = Harness::new()?;
    h.ctx
        .stats_cache()
        .put(br#"[{"username":"cached","avatar":"","count":42}]"#)?;

    let server = TestServer::start(&h).await?;
    let response = server.get("/stats").await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.text().await?,
        r#"[{"username":"cached","avatar":"","count":42}]"#
    );

    Ok(())
}

#[tokio::test]
async fn test_stats_skip_departed_authors() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let kept = h.post(66, "grace", 3);
    let gone = h.post(67, "heidi", 5);
    h.react(&added(kept)).await?;
    h.react(&added(gone)).await?;

    h.chat.remove_member(67);
    h.ctx.stats_cache().invalidate()?;

    let server = TestServer::start(&h).await?;
    let stats: Vec<StatsEntry> = assert_json(server.get("/stats").await?, StatusCode::OK).await?;
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].username, "grace");

    Ok(())
}

#[tokio::test]
async fn test_stats_not_cached_when_author_lookup_fails() -> anyhow::Result<()> {
    let h = Harness::new()?;
    for (author, name, keks) in [(68, "alice", 3), (69, "bob", 9)] {
        let id = h.post(author, name, keks);
        h.react(&added(id)).await?;
    }

    h.chat.set_member_unreachable(69, true);
    let server = TestServer::start(&h).await?;
    assert_status(server.get("/stats").await?, StatusCode::BAD_GATEWAY).await?;
    assert!(!h.stats_cached());

    h.chat.set_member_unreachable(69, false);
    let stats: Vec<StatsEntry> = assert_json(server.get("/stats").await?, StatusCode::OK).await?;
    let summary: Vec<(&str, u64)> = stats.iter().map(|s| (s.username.as_str(), s.count)).collect();
    assert_eq!(summary, vec![("bob", 9), ("alice", 3)]);
    assert!(h.stats_cached());

    Ok(())
}

// ============================================================================
// CORS
// ============================================================================

#[tokio::test]
async fn test_cors_allows_dashboard_origin() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let server = TestServer::start(&h).await?;

    let response = server.get_from_origin("/stats", "https://dashboard.example").await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));

    Ok(())
}
