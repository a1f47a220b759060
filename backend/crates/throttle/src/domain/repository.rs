//! Repository Traits
//!
//! Interfaces for window counter persistence. Implementations live in
//! the infrastructure layer.

use crate::application::config::{RateDecision, RatePolicy};
use crate::domain::value_objects::RateKey;
use crate::error::ThrottleResult;

/// Window counter store trait
///
/// `check_and_consume` is the whole contract: one call both decides and
/// records, so two concurrent requests can never both claim the last
/// slot in a window.
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Atomically count this request against the key's current window
    async fn check_and_consume(
        &self,
        key: &RateKey,
        policy: &RatePolicy,
        now_ms: i64,
    ) -> ThrottleResult<RateDecision>;

    /// Delete every stale window, returning the count removed
    async fn purge_expired(&self, now_ms: i64) -> ThrottleResult<u64>;
}
