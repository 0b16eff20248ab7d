//! Axum router construction.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- animation catalog
/// - `GET /{*name}` -- animation stream; every other path lands here so
///   the handler can reject bad names with a 400
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/{*name}", get(handlers::stream_animation))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
