//! In-Memory Counter Store
//!
//! Process-local window counters behind a mutex. Single-instance
//! semantics only; multi-instance deployments use the PostgreSQL store
//! so every instance sees the same counters.

use crate::application::config::{RateDecision, RatePolicy};
use crate::domain::entities::WindowCounter;
use crate::domain::repository::RateLimitStore;
use crate::domain::value_objects::RateKey;
use crate::error::ThrottleResult;
use platform::sweep::SweepCadence;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Process-local window counter store
#[derive(Clone)]
pub struct MemoryRateLimitStore {
    windows: Arc<Mutex<HashMap<String, WindowCounter>>>,
    sweep: SweepCadence,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::with_sweep(SweepCadence::default())
    }

    pub fn with_sweep(sweep: SweepCadence) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            sweep,
        }
    }

    pub fn len(&self) -> usize {
        self.windows.lock().expect("rate limit mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge_locked(windows: &mut HashMap<String, WindowCounter>, now_ms: i64) -> u64 {
        let before = windows.len();
        windows.retain(|_, counter| !counter.is_stale(now_ms));
        (before - windows.len()) as u64
    }
}

impl Default for MemoryRateLimitStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    async fn check_and_consume(
        &self,
        key: &RateKey,
        policy: &RatePolicy,
        now_ms: i64,
    ) -> ThrottleResult<RateDecision> {
        let mut windows = self.windows.lock().expect("rate limit mutex poisoned");

        let counter = match windows.get_mut(key.as_str()) {
            Some(counter) if !counter.is_stale(now_ms) => {
                counter.count += 1;
                counter.clone()
            }
            _ => {
                let fresh = WindowCounter::open(now_ms, policy.window_ms());
                windows.insert(key.as_str().to_string(), fresh.clone());
                fresh
            }
        };

        let decision = RateDecision {
            allowed: counter.count <= policy.max_requests,
            limit: policy.max_requests,
            remaining: policy.max_requests.saturating_sub(counter.count),
            reset_at_ms: counter.reset_at_ms,
        };

        if self.sweep.should_sweep_inline() {
            let purged = Self::purge_locked(&mut windows, now_ms);
            if purged > 0 {
                tracing::debug!(purged, "Opportunistic sweep removed stale windows");
            }
        }

        Ok(decision)
    }

    async fn purge_expired(&self, now_ms: i64) -> ThrottleResult<u64> {
        let mut windows = self.windows.lock().expect("rate limit mutex poisoned");
        Ok(Self::purge_locked(&mut windows, now_ms))
    }
}
