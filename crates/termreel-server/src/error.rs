//! Error types for the streaming server.
//!
//! [`ServerError`] covers everything that can go wrong before a stream
//! starts. It converts into a short plain-text HTTP response via its
//! [`IntoResponse`] implementation. Details (paths, I/O errors) are
//! logged, never sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use termreel_frames::{FrameError, LoadError};

/// Errors that end a request before any terminal bytes are sent.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The requested animation name is not a valid identifier.
    #[error(transparent)]
    InvalidName(#[from] FrameError),

    /// No animation with this name exists.
    #[error("animation not found: {0}")]
    NotFound(String),

    /// The animation exists but its frames could not be loaded.
    #[error("failed to load animation: {0}")]
    Load(LoadError),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<LoadError> for ServerError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::NotFound { name } => Self::NotFound(name),
            other => Self::Load(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidName(_) => (StatusCode::BAD_REQUEST, "Invalid animation name"),
            // A broken animation looks the same as a missing one from outside.
            Self::NotFound(_) | Self::Load(_) => (StatusCode::NOT_FOUND, "Animation not found"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        (status, message).into_response()
    }
}
