//! HTTP endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Plain-text list of animations |
//! | `GET` | `/{name}` | Stream an animation (`?fps=N&loops=N`) |

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use termreel_frames::{list_animations, AnimationName};
use tracing::debug;

use crate::error::ServerError;
use crate::params::PlaybackParams;
use crate::state::AppState;
use crate::stream;

/// Content type for every body this server produces.
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

// ---------------------------------------------------------------------------
// GET / -- catalog
// ---------------------------------------------------------------------------

/// List the available animations, or explain how to add some.
pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    let root = state.anims_dir.clone();
    let names = tokio::task::spawn_blocking(move || list_animations(&root))
        .await
        .map_err(|e| ServerError::Internal(format!("catalog task failed: {e}")))?;

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| format!("localhost:{}", state.port), str::to_owned);

    let body = render_index(&names, &state.anims_dir, &host);
    Ok(([(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)], body))
}

/// Render the index page text.
pub fn render_index(names: &[AnimationName], anims_dir: &FsPath, host: &str) -> String {
    let Some(first) = names.first() else {
        let dir = if anims_dir.is_relative() {
            format!("./{}", anims_dir.display())
        } else {
            anims_dir.display().to_string()
        };
        return format!(
            "No animations found.\n\
             Create folders in {dir}/ like 'panda', 'cowy', each with .txt frames.\n"
        );
    };

    let listing: String = names
        .iter()
        .flat_map(|name| ["  /", name.as_str(), "\n"])
        .collect();
    format!(
        "Available animations:\n{listing}\n\
         Example: curl --no-buffer http://{host}/{first}?fps=15&loops=30\n"
    )
}

// ---------------------------------------------------------------------------
// GET /{name} -- animation stream
// ---------------------------------------------------------------------------

/// Validate the name, load the frames, and stream them.
///
/// The route captures the whole path so that names containing `/` get a
/// 400 like any other invalid name instead of falling through to a 404.
/// Nothing is written to the terminal unless the animation loads.
pub async fn stream_animation(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, ServerError> {
    let name = AnimationName::parse(raw.trim_matches('/'))?;

    let params = match query {
        Ok(Query(pairs)) => PlaybackParams::from_query(&pairs),
        Err(e) => {
            debug!(error = %e, "unreadable query string, using default playback");
            PlaybackParams::default()
        }
    };

    let animation = state.cache.get_or_load(&name).await?;
    let body = stream::spawn_stream(name, animation, params);

    Ok((
        [
            (header::CONTENT_TYPE, TEXT_PLAIN_UTF8),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn names(list: &[&str]) -> Vec<AnimationName> {
        list.iter().map(|n| AnimationName::parse(n).unwrap()).collect()
    }

    #[test]
    fn empty_catalog_explains_layout() {
        let body = render_index(&[], &PathBuf::from("anims"), "localhost:8080");
        assert_eq!(
            body,
            "No animations found.\n\
             Create folders in ./anims/ like 'panda', 'cowy', each with .txt frames.\n"
        );
    }

    #[test]
    fn catalog_lists_paths_and_example() {
        let body = render_index(
            &names(&["cowy", "panda"]),
            &PathBuf::from("anims"),
            "example.net:9000",
        );
        assert_eq!(
            body,
            "Available animations:\n  /cowy\n  /panda\n\n\
             Example: curl --no-buffer http://example.net:9000/cowy?fps=15&loops=30\n"
        );
    }

    #[test]
    fn single_animation_catalog() {
        let body = render_index(&names(&["panda"]), &PathBuf::from("/srv/anims"), "h:1");
        assert_eq!(
            body,
            "Available animations:\n  /panda\n\n\
             Example: curl --no-buffer http://h:1/panda?fps=15&loops=30\n"
        );
    }
}
