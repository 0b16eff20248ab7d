//! Server configuration.
//!
//! All configuration comes from environment variables, each with a
//! default, so the server runs with no setup at all:
//!
//! - `PORT` -- TCP port (default `8080`)
//! - `HOST` -- bind address (default `0.0.0.0`)
//! - `ANIMS_DIR` -- animation root directory (default `anims`)
//! - `LOG_FORMAT` -- `text` or `json` (default `text`)
//!
//! Empty values count as unset.

use std::path::PathBuf;

/// Default TCP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default animation root, relative to the working directory.
pub const DEFAULT_ANIMS_DIR: &str = "anims";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `PORT` is not a valid port number.
    #[error("invalid PORT {value:?}: {source}")]
    InvalidPort {
        /// The raw value.
        value: String,
        /// The parse error.
        source: std::num::ParseIntError,
    },

    /// `LOG_FORMAT` is neither `text` nor `json`.
    #[error("invalid LOG_FORMAT {0:?} (expected `text` or `json`)")]
    InvalidLogFormat(String),
}

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
    /// Directory holding one subdirectory per animation.
    pub anims_dir: PathBuf,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: DEFAULT_PORT,
            anims_dir: PathBuf::from(DEFAULT_ANIMS_DIR),
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => defaults.port,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::InvalidLogFormat(value)),
            },
            None => defaults.log_format,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            anims_dir: get("ANIMS_DIR").map_or(defaults.anims_dir, PathBuf::from),
            log_format,
        })
    }

    /// `host:port` string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
