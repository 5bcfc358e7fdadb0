//! Defines routes for the image-hosting surface.
//!
//! ## Structure
//! - `GET  /`        — paginated HTML listing
//! - `POST /`        — authenticated multipart upload
//! - `GET  /image`   — stream one object by key (`?image=<key>`)
//! - `GET  /healthz` — liveness
//! - `GET  /readyz`  — bucket readiness
//!
//! Any other method on the two content routes answers 405, HEAD included;
//! unknown paths keep the framework 404.

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        image_handlers::{fetch_image, list_images, method_not_allowed, upload_image},
    },
    state::AppState,
};
use axum::{Router, extract::DefaultBodyLimit, routing::get};

/// Upload bodies are capped at the multipart parse threshold.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Build and return the router for all image-hosting routes.
///
/// The router carries shared state (`AppState`) to all handlers; the caller
/// attaches it with `with_state`.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // content routes; HEAD is registered explicitly so it answers 405
        // instead of riding along with the GET handler
        .route(
            "/",
            get(list_images)
                .post(upload_image)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route(
            "/image",
            get(fetch_image)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
