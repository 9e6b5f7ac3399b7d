//! Live view HTTP server lifecycle.
//!
//! Binding and serving are separate steps so the caller can treat a bind
//! failure as fatal before anything runs in the background.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Configuration for the live view server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
    /// Directory served for paths no route matches.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 5000,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl ServerConfig {
    /// The socket address to bind.
    pub fn addr(&self) -> Result<SocketAddr, ServerError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ServerError::Bind(format!("invalid address {}:{}: {e}", self.host, self.port)))
    }
}

/// Bind the listener for `config`.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address is invalid or in use.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    let addr = config.addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;
    info!(%addr, "live view server listening");
    Ok(listener)
}

/// Serve requests on an already bound listener until the state's
/// shutdown token is cancelled.
///
/// # Errors
///
/// Returns [`ServerError::Serve`] on a fatal I/O error.
pub async fn serve(
    listener: TcpListener,
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<(), ServerError> {
    let shutdown = state.shutdown_token();
    let router = build_router(state, &config.static_dir);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    info!("live view server stopped");
    Ok(())
}

/// Errors that can occur when starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listens_on_5000() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.addr().ok(), "0.0.0.0:5000".parse().ok());
    }

    #[test]
    fn invalid_host_is_bind_error() {
        let config = ServerConfig {
            host: String::from("not a host"),
            ..ServerConfig::default()
        };
        assert!(matches!(config.addr(), Err(ServerError::Bind(_))));
    }

    #[tokio::test]
    async fn port_in_use_is_bind_error() {
        let config = ServerConfig {
            host: String::from("127.0.0.1"),
            port: 0,
            ..ServerConfig::default()
        };
        let first = bind(&config).await;
        assert!(first.is_ok());
        let Ok(first) = first else { return };
        let taken = first.local_addr().map(|a| a.port()).unwrap_or_default();

        let again = ServerConfig { port: taken, ..config };
        assert!(matches!(bind(&again).await, Err(ServerError::Bind(_))));
    }
}
