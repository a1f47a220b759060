//! CSRF Request Guard

use crate::application::VerifyTokenUseCase;
use crate::application::config::CsrfConfig;
use crate::domain::repository::CsrfTokenRepository;
use crate::domain::value_objects::SessionKey;
use crate::error::CsrfError;
use axum::response::IntoResponse;
use platform::guard::{GuardDecision, NamedGuard};
use std::sync::Arc;

/// Build the CSRF guard for the request guard chain
///
/// Safe methods and exempt paths pass through. Everything else must
/// carry a token in the configured header that matches the stored token
/// for the derived session key. Missing and invalid tokens halt with
/// distinct 403 bodies.
pub fn csrf_guard<R>(repo: Arc<R>, config: Arc<CsrfConfig>) -> NamedGuard
where
    R: CsrfTokenRepository + Send + Sync + 'static,
{
    NamedGuard::new("csrf", move |ctx| {
        let repo = repo.clone();
        let config = config.clone();

        async move {
            if !config.requires_token(&ctx.method, &ctx.path) {
                return GuardDecision::pass();
            }

            let provided = ctx
                .headers
                .get(config.header_name.as_str())
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());

            let Some(provided) = provided else {
                return GuardDecision::Halt(CsrfError::TokenMissing.into_response());
            };

            let session_key =
                SessionKey::derive(&ctx.headers, ctx.client_ip, &config.session_cookie_name);

            let use_case = VerifyTokenUseCase::new(repo);
            match use_case.execute(&session_key, &provided).await {
                Ok(true) => GuardDecision::pass(),
                Ok(false) => GuardDecision::Halt(CsrfError::TokenInvalid.into_response()),
                Err(err) => GuardDecision::Halt(err.into_response()),
            }
        }
    })
}
