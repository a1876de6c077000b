//! Kekboard bot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p kekboard-bot
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use kekboard_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Bot failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        port = config.api.port,
        threshold = config.board.reaction_threshold,
        target = %config.board.emoji_target,
        "Configuration loaded"
    );

    kekboard_bot::run(config).await?;

    Ok(())
}
