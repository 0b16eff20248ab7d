//! termreel server binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize structured logging (tracing)
//! 3. Build shared state (empty animation cache)
//! 4. Bind and serve until terminated

use std::sync::Arc;

use termreel_server::{start_server, AppState, LogFormat, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the port cannot
/// be bound.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = ServerConfig::from_env()?;

    // 2. Initialize structured logging.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }

    info!(
        host = %config.host,
        port = config.port,
        anims_dir = %config.anims_dir.display(),
        "termreel starting"
    );

    // 3. Build shared state.
    let state = Arc::new(AppState::new(&config));

    // 4. Serve.
    start_server(&config, state).await?;

    Ok(())
}
