//! Server lifecycle management.
//!
//! Provides [`start_server`] which binds to a TCP port and runs the
//! Axum server until the process is terminated. Every connection is
//! served on its own task, and every stream runs on a further task of
//! its own, so a long animation never holds up other clients.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::router::build_router;
use crate::state::AppState;

/// Errors that can occur when starting or running the server.
///
/// These are the only failures that end the process.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

/// Bind to the configured address and serve until terminated.
///
/// # Errors
///
/// Returns an error if the address is invalid, the TCP listener cannot
/// bind, or the server hits a fatal I/O error.
pub async fn start_server(config: &ServerConfig, state: Arc<AppState>) -> Result<(), StartupError> {
    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::Bind(format!("invalid address: {e}")))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, anims_dir = %state.anims_dir.display(), "termreel listening");

    serve(listener, state).await
}

/// Serve requests on an already bound listener.
///
/// # Errors
///
/// Returns [`StartupError::Serve`] if the server hits a fatal I/O error.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<(), StartupError> {
    let router = build_router(state);

    axum::serve(listener, router)
        .await
        .map_err(|e| StartupError::Serve(format!("serve error: {e}")))
}
