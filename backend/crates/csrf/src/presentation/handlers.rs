//! HTTP Handlers

use crate::application::IssueTokenUseCase;
use crate::application::config::CsrfConfig;
use crate::domain::repository::CsrfTokenRepository;
use crate::domain::value_objects::SessionKey;
use crate::error::CsrfResult;
use crate::presentation::dto::CsrfTokenResponse;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use axum::response::{AppendHeaders, IntoResponse};
use platform::cookie::{extract_cookie, set_cookie_header};
use platform::crypto::random_token;
use std::sync::Arc;

/// Shared state for CSRF handlers
#[derive(Clone)]
pub struct CsrfAppState<R>
where
    R: CsrfTokenRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<CsrfConfig>,
}

/// GET /api/csrf
///
/// Issues a token bound to the session-identity cookie (generated fresh
/// when absent) and returns it three ways: JSON body, readable cookie,
/// and response header.
pub async fn issue_token<R>(
    State(state): State<CsrfAppState<R>>,
    headers: HeaderMap,
) -> CsrfResult<impl IntoResponse>
where
    R: CsrfTokenRepository + Clone + Send + Sync + 'static,
{
    let config = &state.config;

    let session_id = extract_cookie(&headers, &config.session_cookie_name)
        .unwrap_or_else(|| random_token(config.session_id_length));

    let session_key = SessionKey::from_session_id(&session_id);

    let use_case = IssueTokenUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(&session_key).await?;

    let token_header = HeaderName::try_from(config.header_name.as_str())
        .unwrap_or(HeaderName::from_static("x-csrf-token"));
    let token_value = HeaderValue::from_str(&output.token)
        .unwrap_or_else(|_| HeaderValue::from_static(""));

    let response_headers = AppendHeaders(vec![
        (
            header::SET_COOKIE,
            set_cookie_header(&config.session_cookie(), &session_id),
        ),
        (
            header::SET_COOKIE,
            set_cookie_header(&config.token_cookie(), &output.token),
        ),
        (token_header, token_value),
    ]);

    Ok((
        response_headers,
        Json(CsrfTokenResponse {
            csrf_token: output.token,
        }),
    ))
}
