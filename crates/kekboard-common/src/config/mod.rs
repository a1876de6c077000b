//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BoardConfig, ConfigError, CorsConfig, DiscordConfig, Environment,
    RuntimeConfig, ServerConfig, StorageConfig,
};
