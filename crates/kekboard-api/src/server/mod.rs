//! Server setup and initialization
//!
//! Provides the application builder and the server runner with graceful shutdown.

use std::future::Future;

use axum::Router;
use kekboard_common::AppError;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = apply_middleware(create_router(), &state.config().cors);
    router.with_state(state)
}

/// Bind the listener for the HTTP server
pub async fn bind(addr: &str) -> Result<TcpListener, AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    if let Ok(local) = listener.local_addr() {
        info!("Server listening on http://{}", local);
    }

    Ok(listener)
}

/// Serve on a bound listener until `shutdown` resolves
///
/// In-flight requests are allowed to finish after the signal.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Server error: {e}")))?;

    info!("HTTP server stopped");
    Ok(())
}
