//! Check Rate Limit Use Case

use crate::application::config::{RateDecision, RatePolicy};
use crate::domain::repository::RateLimitStore;
use crate::domain::value_objects::RateKey;
use crate::error::ThrottleResult;
use chrono::Utc;
use std::sync::Arc;

/// Check Rate Limit Use Case
///
/// Counts one request for the key against the policy's window and
/// reports whether it fit.
pub struct CheckRateLimitUseCase<S>
where
    S: RateLimitStore,
{
    store: Arc<S>,
    policy: RatePolicy,
}

impl<S> CheckRateLimitUseCase<S>
where
    S: RateLimitStore,
{
    pub fn new(store: Arc<S>, policy: RatePolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &RatePolicy {
        &self.policy
    }

    pub async fn execute(&self, key: &RateKey) -> ThrottleResult<RateDecision> {
        let now_ms = Utc::now().timestamp_millis();

        let decision = self.store.check_and_consume(key, &self.policy, now_ms).await?;

        if !decision.allowed {
            tracing::warn!(
                policy = self.policy.name,
                key = %key,
                reset_at_ms = decision.reset_at_ms,
                "Rate limit exceeded"
            );
        }

        Ok(decision)
    }
}
