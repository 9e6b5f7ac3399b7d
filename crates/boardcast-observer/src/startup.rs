//! Server startup helper for the engine binary.
//!
//! [`spawn_observer`] binds eagerly, so a port that cannot be bound is
//! reported to the caller, then serves on a background Tokio task.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Bind the server and spawn it on a background task.
///
/// The returned handle completes when the state's shutdown token is
/// cancelled and open connections have drained.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address cannot be bound.
pub async fn spawn_observer(
    config: ServerConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<()>, StartupError> {
    let listener = crate::server::bind(&config).await?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;

    let handle = tokio::spawn(async move {
        if let Err(e) = crate::server::serve(listener, &config, state).await {
            tracing::error!(error = %e, "live view server exited with error");
        }
    });

    tracing::info!(%local_addr, "live view server spawned on background task");

    Ok(handle)
}
