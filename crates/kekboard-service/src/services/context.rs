//! Service context - dependency container for services
//!
//! Holds the chat client, the stores and the board settings needed by services.

use std::sync::Arc;

use kekboard_common::BoardConfig;
use kekboard_core::{ChatClient, Snowflake, ThresholdPolicy};
use kekboard_store::{BoardStateStore, KvStore, StatsCacheStore};
use parking_lot::Mutex;

use super::error::{ServiceError, ServiceResult};

/// Board settings fixed at startup
#[derive(Debug, Clone)]
pub struct BoardSettings {
    policy: ThresholdPolicy,
    channel_id: Snowflake,
    emoji: String,
}

impl BoardSettings {
    /// Create board settings
    pub fn new(policy: ThresholdPolicy, channel_id: Snowflake, emoji: impl Into<String>) -> Self {
        Self {
            policy,
            channel_id,
            emoji: emoji.into(),
        }
    }

    /// Build settings from the loaded configuration
    pub fn from_config(config: &BoardConfig) -> ServiceResult<Self> {
        let policy = ThresholdPolicy::new(config.reaction_threshold, &config.emoji_target)?;
        Ok(Self::new(policy, config.channel_id, config.emoji.clone()))
    }

    /// Threshold and target reaction
    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    /// Board channel
    pub fn channel_id(&self) -> Snowflake {
        self.channel_id
    }

    /// Emoji shown in the copy header
    pub fn emoji(&self) -> &str {
        &self.emoji
    }
}

/// Service context containing all dependencies
///
/// Cloning is cheap; every clone shares the same store, client and stats epoch.
#[derive(Clone)]
pub struct ServiceContext {
    kv: KvStore,
    chat: Arc<dyn ChatClient>,
    board_states: BoardStateStore,
    stats_cache: StatsCacheStore,
    settings: Arc<BoardSettings>,
    // Bumped on every invalidation; a stats rebuild is only cached if the
    // epoch it started under is still current.
    stats_epoch: Arc<Mutex<u64>>,
}

impl ServiceContext {
    /// Create a new service context
    pub fn new(kv: KvStore, chat: Arc<dyn ChatClient>, settings: BoardSettings) -> Self {
        Self {
            board_states: BoardStateStore::new(kv.clone()),
            stats_cache: StatsCacheStore::new(kv.clone()),
            kv,
            chat,
            settings: Arc::new(settings),
            stats_epoch: Arc::new(Mutex::new(0)),
        }
    }

    /// Get the underlying key-value store
    pub fn kv(&self) -> &KvStore {
        &self.kv
    }

    /// Get the chat platform client
    pub fn chat(&self) -> &dyn ChatClient {
        self.chat.as_ref()
    }

    /// Get the board state store
    pub fn board_states(&self) -> &BoardStateStore {
        &self.board_states
    }

    /// Get the stats cache store
    pub fn stats_cache(&self) -> &StatsCacheStore {
        &self.stats_cache
    }

    /// Get the board settings
    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    pub(crate) fn stats_epoch(&self) -> &Mutex<u64> {
        &self.stats_epoch
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("kv", &self.kv)
            .field("chat", &"dyn ChatClient")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    kv: Option<KvStore>,
    chat: Option<Arc<dyn ChatClient>>,
    settings: Option<BoardSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kv(mut self, kv: KvStore) -> Self {
        self.kv = Some(kv);
        self
    }

    pub fn chat(mut self, chat: Arc<dyn ChatClient>) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn settings(mut self, settings: BoardSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.kv.ok_or_else(|| ServiceError::validation("kv store is required"))?,
            self.chat.ok_or_else(|| ServiceError::validation("chat client is required"))?,
            self.settings.ok_or_else(|| ServiceError::validation("board settings are required"))?,
        ))
    }
}
