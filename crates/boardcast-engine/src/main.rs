//! Boardcast engine binary.
//!
//! Wires console move input to the live view server.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `boardcast-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Create the shared application state with a standard board
//! 4. Bind and spawn the live view server (bind failure is fatal)
//! 5. Forward stdin lines to the board until end of input
//! 6. Keep serving until Ctrl-C, then cancel viewers and drain

mod config;
mod console;
mod error;

use std::path::Path;
use std::sync::Arc;

use boardcast_observer::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::BoardcastConfig;
use crate::error::EngineError;

/// Configuration file looked up in the working directory.
const CONFIG_FILE: &str = "boardcast-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the server cannot
/// bind, or console I/O fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        host = config.server.host,
        port = config.server.port,
        static_dir = %config.server.static_dir.display(),
        unmapped_squares = ?config.board.unmapped_squares,
        "boardcast-engine starting"
    );

    // 3. Shared state.
    let state = Arc::new(AppState::with_policy(config.board.unmapped_squares));

    // 4. Live view server.
    let server = boardcast_observer::spawn_observer(
        config.server.to_server_config(),
        Arc::clone(&state),
    )
    .await
    .map_err(EngineError::from)?;

    // 5. Console input: reader thread feeding a forwarding task.
    let lines = console::spawn_stdin_reader().map_err(EngineError::from)?;
    let input_state = Arc::clone(&state);
    let input = tokio::spawn(async move { console::forward(&input_state, lines).await });

    // 6. Serve until Ctrl-C.
    tokio::signal::ctrl_c().await.map_err(EngineError::from)?;
    info!("interrupt received, shutting down");

    input.abort();
    state.shutdown();
    server.await.map_err(|e| EngineError::ServerTask {
        message: format!("{e}"),
    })?;

    info!("boardcast-engine shutdown complete");
    Ok(())
}

/// Load configuration from [`CONFIG_FILE`], falling back to defaults.
fn load_config() -> Result<BoardcastConfig, EngineError> {
    let config_path = Path::new(CONFIG_FILE);
    if config_path.exists() {
        Ok(BoardcastConfig::from_file(config_path)?)
    } else {
        Ok(BoardcastConfig::default())
    }
}
