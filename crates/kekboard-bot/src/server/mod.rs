//! Process setup and lifecycle
//!
//! Opens the store, starts the event serializer, the stats HTTP server and
//! the gateway client, then tears them down in order on SIGINT or SIGTERM.

use std::sync::Arc;

use kekboard_api::{bind, create_app, serve, AppState};
use kekboard_common::{AppConfig, AppError};
use kekboard_core::ChatClient;
use kekboard_service::{BoardSettings, EventSerializer, ServiceContext, SyncWorker};
use kekboard_store::{KvConfig, KvStore};
use serenity::Client;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::discord::DiscordChatClient;
use crate::events::{gateway_intents, BoardEventHandler};

/// Build the service context over an opened store
pub fn create_service_context(
    config: &AppConfig,
    kv: KvStore,
    chat: Arc<dyn ChatClient>,
) -> Result<ServiceContext, AppError> {
    let settings = BoardSettings::from_config(&config.board).map_err(AppError::from)?;

    info!(
        threshold = settings.policy().threshold(),
        target = %settings.policy().target(),
        board_channel_id = %settings.channel_id(),
        "Board settings loaded"
    );

    Ok(ServiceContext::new(kv, chat, settings))
}

/// Resolves on SIGINT or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT"),
        () = terminate => info!("Received SIGTERM"),
    }
}

/// Run the bot until a shutdown signal or the gateway stops
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let grace = config.runtime.shutdown_grace();

    // Store
    let kv = KvStore::open(&KvConfig::from(&config.storage))
        .map_err(|e| AppError::Storage(e.to_string()))?;

    // Services
    let chat = Arc::new(DiscordChatClient::from_token(&config.discord.token));
    let ctx = Arc::new(create_service_context(&config, kv.clone(), chat)?);

    // Event pipeline
    let (events, serializer) = EventSerializer::spawn(
        SyncWorker::new(ctx.clone()),
        config.runtime.event_queue_capacity,
    );

    // Stats server
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let listener = bind(&config.api.address()).await?;
    let app = create_app(AppState::new(ctx.clone(), Arc::new(config.clone())));
    let mut http_task = tokio::spawn(serve(listener, app, async move {
        let _ = stop_rx.changed().await;
    }));

    // Gateway
    let mut client = Client::builder(&config.discord.token, gateway_intents())
        .event_handler(BoardEventHandler::new(events))
        .await
        .map_err(|e| AppError::ExternalService(format!("Failed to create Discord client: {e}")))?;
    let shard_manager = client.shard_manager.clone();
    let mut gateway_task = tokio::spawn(async move { client.start().await });

    info!("Kekboard running");

    tokio::select! {
        () = shutdown_signal() => {}
        result = &mut gateway_task => match result {
            Ok(Ok(())) => warn!("Gateway client stopped"),
            Ok(Err(e)) => error!(error = %e, "Gateway client failed"),
            Err(e) => error!(error = %e, "Gateway task panicked"),
        },
        result = &mut http_task => match result {
            Ok(Ok(())) => warn!("HTTP server stopped"),
            Ok(Err(e)) => error!(error = %e, "HTTP server failed"),
            Err(e) => error!(error = %e, "HTTP server task panicked"),
        },
    }

    info!(grace_secs = grace.as_secs(), "Shutting down");

    // Stop taking new work first
    shard_manager.shutdown_all().await;
    if !gateway_task.is_finished() {
        gateway_task.abort();
    }

    let _ = stop_tx.send(true);
    if !http_task.is_finished() && tokio::time::timeout(grace, &mut http_task).await.is_err() {
        warn!("HTTP server did not stop within grace period");
        http_task.abort();
    }

    serializer.shutdown(grace).await;

    match kv.flush().await {
        Ok(bytes) => info!(bytes, "Store flushed"),
        Err(e) => error!(error = %e, "Failed to flush store"),
    }

    info!("Shutdown complete");
    Ok(())
}
