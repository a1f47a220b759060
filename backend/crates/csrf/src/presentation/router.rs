//! CSRF Router

use crate::application::config::CsrfConfig;
use crate::domain::repository::CsrfTokenRepository;
use crate::presentation::handlers::{self, CsrfAppState};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Create the CSRF router for any repository implementation
pub fn csrf_router<R>(repo: Arc<R>, config: Arc<CsrfConfig>) -> Router
where
    R: CsrfTokenRepository + Clone + Send + Sync + 'static,
{
    let state = CsrfAppState { repo, config };

    Router::new()
        .route("/", get(handlers::issue_token::<R>))
        .with_state(state)
}
