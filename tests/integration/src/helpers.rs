//! Test helpers for integration tests
//!
//! Provides a harness wiring the services to an in-memory chat platform,
//! a test server for the stats endpoint, and response assertions.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use kekboard_api::{create_app, AppState};
use kekboard_common::AppConfig;
use kekboard_core::{BoardAction, MessageBoardState, ReactionEvent, Snowflake};
use kekboard_service::{BoardSyncService, ServiceContext, ServiceResult, StatsEntry, StatsService};
use kekboard_store::{KvConfig, KvStore};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{member, message, test_settings, FakeChatClient, SOURCE_CHANNEL_ID};

/// Counter for unique test ports
static PORT_COUNTER: AtomicU16 = AtomicU16::new(19000);

/// Get a unique port for testing
pub fn get_test_port() -> u16 {
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Configuration for tests, independent of the process environment
pub fn test_config() -> Result<AppConfig> {
    let vars: HashMap<&str, &str> = [
        ("APP_ENV", "development"),
        ("BOT_TOKEN", "test-token"),
        ("REACTION_THRESHOLD", "3"),
        ("KEKBOARD_CHANNEL_ID", "900"),
        ("KEK_EMOJI", "<:kek:77>"),
        ("API_HOST", "127.0.0.1"),
    ]
    .into_iter()
    .collect();

    Ok(AppConfig::from_lookup(|key| vars.get(key).map(ToString::to_string))?)
}

/// Open a persistent store under `dir` without a background flusher
pub fn open_store(dir: &Path) -> Result<KvStore> {
    let config = KvConfig {
        path: dir.join("kekboard.db"),
        flush_every_ms: None,
        ..KvConfig::default()
    };
    Ok(KvStore::open(&config)?)
}

/// Services over a fake chat platform and an isolated store
pub struct Harness {
    pub chat: Arc<FakeChatClient>,
    pub ctx: Arc<ServiceContext>,
}

impl Harness {
    /// Harness over a temporary store
    pub fn new() -> Result<Self> {
        Ok(Self::with_store(KvStore::temporary()?))
    }

    /// Harness over a store persisted under `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        Ok(Self::with_store(open_store(dir)?))
    }

    /// Harness over an existing store
    pub fn with_store(kv: KvStore) -> Self {
        Self::with_chat(kv, Arc::new(FakeChatClient::new()))
    }

    /// Harness sharing a chat platform
    pub fn with_chat(kv: KvStore, chat: Arc<FakeChatClient>) -> Self {
        let ctx = ServiceContext::new(kv, chat.clone(), test_settings());
        Self {
            chat,
            ctx: Arc::new(ctx),
        }
    }

    /// Post a source message by a known author with the given kek count
    pub fn post(&self, author_id: u64, username: &str, keks: u64) -> Snowflake {
        let id = crate::fixtures::unique_id();
        self.chat.add_member(member(author_id, username));
        self.chat
            .add_message(message(id, author_id, "lol").with_reaction("kek", keks));
        id
    }

    /// Run one event through the sync service
    pub async fn react(&self, event: &ReactionEvent) -> ServiceResult<BoardAction> {
        BoardSyncService::new(&self.ctx).handle(event).await
    }

    /// Stored state for a source message
    pub fn state(&self, message_id: Snowflake) -> Option<MessageBoardState> {
        self.ctx
            .board_states()
            .get(SOURCE_CHANNEL_ID, message_id)
            .ok()
            .flatten()
    }

    /// Decoded stats list as served over HTTP
    pub async fn stats(&self) -> Result<Vec<StatsEntry>> {
        let bytes = StatsService::new(&self.ctx).read().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Check whether the stats cache is populated
    pub fn stats_cached(&self) -> bool {
        self.ctx.stats_cache().get().ok().flatten().is_some()
    }
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a test server over a harness
    pub async fn start(harness: &Harness) -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(harness, config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(harness: &Harness, config: AppConfig) -> Result<Self> {
        let port = get_test_port();
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        let state = AppState::new(harness.ctx.clone(), Arc::new(config));
        let app = create_app(state);

        // Bind to port
        let listener = TcpListener::bind(addr).await?;
        let actual_addr = listener.local_addr()?;

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr: actual_addr,
            client,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with an Origin header
    pub async fn get_from_origin(&self, path: &str, origin: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).header("Origin", origin).send().await?)
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Expected status {}, got {}. Body: {}", expected_status, status, body);
    }
    Ok(response.json().await?)
}

/// Assert response status only
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Expected status {}, got {}. Body: {}", expected_status, status, body);
    }
    Ok(())
}
