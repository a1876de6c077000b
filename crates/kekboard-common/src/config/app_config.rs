//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).
//! All values are read once at startup and never change for the process lifetime.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use kekboard_core::Snowflake;
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub discord: DiscordConfig,
    pub board: BoardConfig,
    pub storage: StorageConfig,
    pub cors: CorsConfig,
    pub runtime: RuntimeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration for the stats endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Discord connection settings
#[derive(Clone, Deserialize)]
pub struct DiscordConfig {
    pub token: String,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Board behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// Minimum matching reactions for a message to be on the board
    pub reaction_threshold: u64,
    /// Case-insensitive substring a reaction name must contain
    #[serde(default = "default_emoji_target")]
    pub emoji_target: String,
    /// Channel holding the board copies
    pub channel_id: Snowflake,
    /// Emoji rendered in front of the count on each copy
    pub emoji: String,
}

/// Embedded storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Empty means any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Event pipeline and lifecycle tuning
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_queue_capacity")]
    pub event_queue_capacity: usize,
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl RuntimeConfig {
    #[must_use]
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_queue_capacity: default_queue_capacity(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "kekboard".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_emoji_target() -> String {
    "kek".to_string()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("kekboard.db")
}

fn default_queue_capacity() -> usize {
    128
}

fn default_shutdown_grace_secs() -> u64 {
    10
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| var(key).ok_or(ConfigError::MissingVar(key));

        let reaction_threshold = required("REACTION_THRESHOLD")?
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|t| *t >= 1)
            .ok_or_else(|| {
                ConfigError::InvalidValue("REACTION_THRESHOLD", "expected an integer >= 1".to_string())
            })?;

        let channel_id = Snowflake::parse(&required("KEKBOARD_CHANNEL_ID")?).map_err(|e| {
            ConfigError::InvalidValue("KEKBOARD_CHANNEL_ID", e.to_string())
        })?;

        let port = match var("API_PORT") {
            Some(s) => s
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("API_PORT", s.clone()))?,
            None => default_port(),
        };

        let event_queue_capacity = match var("EVENT_QUEUE_CAPACITY") {
            Some(s) => s
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|c| *c > 0)
                .ok_or(ConfigError::InvalidValue("EVENT_QUEUE_CAPACITY", s))?,
            None => default_queue_capacity(),
        };

        Ok(Self {
            app: AppSettings {
                name: var("APP_NAME").unwrap_or_else(default_app_name),
                env: var("APP_ENV")
                    .as_deref()
                    .and_then(Environment::parse)
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: var("API_HOST").unwrap_or_else(default_host),
                port,
            },
            discord: DiscordConfig {
                token: required("BOT_TOKEN")?,
            },
            board: BoardConfig {
                reaction_threshold,
                emoji_target: var("EMOJI_TARGET")
                    .map(|s| s.trim().to_lowercase())
                    .unwrap_or_else(default_emoji_target),
                channel_id,
                emoji: required("KEK_EMOJI")?,
            },
            storage: StorageConfig {
                path: var("DB_PATH").map_or_else(default_db_path, PathBuf::from),
            },
            cors: CorsConfig {
                allowed_origins: var("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty() && *o != "*")
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            runtime: RuntimeConfig {
                event_queue_capacity,
                shutdown_grace_secs: var("SHUTDOWN_GRACE_SECS")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or_else(default_shutdown_grace_secs),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
