//! Streaming server for terminal ASCII animations.
//!
//! `curl --no-buffer http://host:8080/panda` plays the `panda` animation
//! in place in the caller's terminal. This crate provides:
//!
//! - **`GET /`** -- a plain-text catalog of the animations on disk
//! - **`GET /{name}`** -- the animation stream, paced by `?fps=` and
//!   repeated `?loops=` times, wrapped in terminal setup and teardown
//!   sequences
//!
//! # Architecture
//!
//! Frames are read and normalized by [`termreel_frames`], then kept in a
//! process-wide [`AnimationCache`]. Each stream is played by its own
//! Tokio task that writes into the response body through a bounded
//! channel; a failed send is how the task learns that the client has
//! gone, at which point it stops and attempts the terminal teardown.
//!
//! [`AnimationCache`]: cache::AnimationCache

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod params;
pub mod router;
pub mod server;
pub mod state;
pub mod stream;

// Re-export primary types for convenience.
pub use config::{ConfigError, LogFormat, ServerConfig};
pub use error::ServerError;
pub use router::build_router;
pub use server::{serve, start_server, StartupError};
pub use state::AppState;
