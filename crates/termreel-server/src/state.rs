//! Shared application state.
//!
//! [`AppState`] is wrapped in [`Arc`] and injected via Axum's `State`
//! extractor. The animation cache is the only thing shared between
//! connections.

use std::path::PathBuf;
use std::sync::Arc;

use termreel_frames::{FrameSource, FrameStore};

use crate::cache::AnimationCache;
use crate::config::{ServerConfig, DEFAULT_PORT};

/// Shared state for the Axum application.
#[derive(Debug)]
pub struct AppState {
    /// Loaded animations, keyed by name.
    pub cache: AnimationCache,
    /// Directory the catalog is listed from.
    pub anims_dir: PathBuf,
    /// Port the server listens on, used in the index page example.
    pub port: u16,
}

impl AppState {
    /// State serving animations from the configured directory.
    pub fn new(config: &ServerConfig) -> Self {
        let store = FrameStore::new(&config.anims_dir);
        Self {
            cache: AnimationCache::new(Arc::new(store)),
            anims_dir: config.anims_dir.clone(),
            port: config.port,
        }
    }

    /// State listing `anims_dir` but loading frames from `source`.
    pub fn with_source(anims_dir: impl Into<PathBuf>, source: Arc<dyn FrameSource>) -> Self {
        Self {
            cache: AnimationCache::new(source),
            anims_dir: anims_dir.into(),
            port: DEFAULT_PORT,
        }
    }
}
