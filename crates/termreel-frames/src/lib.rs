//! Frame sets for the termreel animation server.
//!
//! This crate owns everything that touches the animation directory on
//! disk:
//!
//! - [`name`] -- [`AnimationName`], the validated identifier that doubles
//!   as a directory name and cache key
//! - [`natural`] -- natural ("human") ordering of frame and directory names
//! - [`frame`] -- [`Frame`] and [`FrameSet`], including grid normalization
//! - [`store`] -- [`FrameStore`], the loader behind the [`FrameSource`] trait
//! - [`catalog`] -- [`list_animations`] for the index page
//!
//! Everything here is synchronous. The server runs loads on a blocking
//! worker so the async runtime never stalls on the filesystem.

pub mod catalog;
pub mod error;
pub mod frame;
pub mod name;
pub mod natural;
pub mod store;

pub use catalog::list_animations;
pub use error::{FrameError, LoadError};
pub use frame::{Frame, FrameSet};
pub use name::AnimationName;
pub use store::{FrameSource, FrameStore, FRAME_EXTENSION};
