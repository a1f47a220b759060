//! Upload Router

use crate::application::config::UploadConfig;
use crate::presentation::handlers;
use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::post};

/// Create the upload router
pub fn upload_router(config: &UploadConfig) -> Router {
    Router::new()
        .route("/", post(handlers::upload))
        .layer(DefaultBodyLimit::max(config.max_request_bytes))
}
