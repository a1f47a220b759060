//! Rate Limit Request Guard

use crate::application::CheckRateLimitUseCase;
use crate::application::config::{RateDecision, RatePolicy};
use crate::domain::repository::RateLimitStore;
use crate::domain::value_objects::RateKey;
use crate::error::ThrottleError;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use chrono::Utc;
use platform::guard::{GuardDecision, NamedGuard};
use std::sync::Arc;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

fn decision_headers(decision: &RateDecision) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let entries = [
        (LIMIT_HEADER, decision.limit.to_string()),
        (REMAINING_HEADER, decision.remaining.to_string()),
        (RESET_HEADER, decision.reset_at_secs().to_string()),
    ];
    for (name, value) in entries {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(name, value);
        }
    }

    headers
}

/// Build a rate limit guard for the request guard chain
///
/// Allowed requests continue and contribute `X-RateLimit-*` headers to
/// the response. Exhausted windows halt with `429` plus `Retry-After`.
/// Store failures halt with `500`; the limiter fails closed.
pub fn rate_limit_guard<S>(store: Arc<S>, policy: RatePolicy) -> NamedGuard
where
    S: RateLimitStore + Send + Sync + 'static,
{
    let name = policy.name;
    let use_case = Arc::new(CheckRateLimitUseCase::new(store, policy));

    NamedGuard::new(name, move |ctx| {
        let use_case = use_case.clone();

        async move {
            let policy = use_case.policy();
            let key = if policy.per_user {
                RateKey::for_user_policy(policy.name, &ctx.headers, ctx.client_ip)
            } else {
                RateKey::from_ip(policy.name, ctx.client_ip)
            };

            let decision = match use_case.execute(&key).await {
                Ok(decision) => decision,
                Err(err) => return GuardDecision::Halt(err.into_response()),
            };

            let headers = decision_headers(&decision);

            if decision.allowed {
                GuardDecision::Continue(headers)
            } else {
                let now_ms = Utc::now().timestamp_millis();
                let err = ThrottleError::LimitExceeded {
                    retry_after_secs: decision.retry_after_secs(now_ms),
                };
                let mut response = err.into_response();
                response.headers_mut().extend(headers);
                GuardDecision::Halt(response)
            }
        }
    })
}
