//! Error types for frame discovery and loading.

use std::path::PathBuf;

/// Errors raised while constructing frame-related values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The animation name contains characters outside `[A-Za-z0-9_-]`
    /// or is empty.
    #[error("invalid animation name: {0:?}")]
    InvalidName(String),
}

/// Errors raised while loading an animation's frames from storage.
///
/// None of these are cached: a later request for the same animation
/// retries the load from scratch.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The animation directory is missing or holds no frame files.
    #[error("animation not found: {name}")]
    NotFound {
        /// The requested animation name.
        name: String,
    },

    /// A frame file could not be read.
    #[error("failed to read frame {}: {source}", path.display())]
    Read {
        /// Path of the frame file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A frame file is not valid UTF-8.
    #[error("frame {} is not valid UTF-8: {source}", path.display())]
    Encoding {
        /// Path of the frame file.
        path: PathBuf,
        /// The underlying decoding error.
        source: std::string::FromUtf8Error,
    },
}

impl LoadError {
    /// Whether this error means the animation simply does not exist.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
