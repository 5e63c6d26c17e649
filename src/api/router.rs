//! Route table for the denoising service.
//!
//! `app_router()` returns a composable `Router`: the binary mounts it
//! directly, tests drive it in-process with `tower::ServiceExt::oneshot`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints::{denoise, health, index};
use crate::config;

/// Build the service router. Stateless: every request carries all of
/// its inputs.
pub fn app_router() -> Router {
    Router::new()
        .route("/", get(index::page))
        .route("/api/health", get(health::check))
        .route("/api/denoise", post(denoise::denoise_image))
        .layer(DefaultBodyLimit::max(config::MAX_UPLOAD_BYTES))
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
