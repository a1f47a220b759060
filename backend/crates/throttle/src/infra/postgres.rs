//! PostgreSQL Counter Store
//!
//! Shared-store deployment: every instance counts against the same
//! windows. The reset-or-increment runs as a single statement so
//! concurrent requests across replicas stay atomic.

use crate::application::config::{RateDecision, RatePolicy};
use crate::domain::repository::RateLimitStore;
use crate::domain::value_objects::RateKey;
use crate::error::ThrottleResult;
use sqlx::{PgPool, Row};

/// PostgreSQL-backed window counter store
#[derive(Clone)]
pub struct PgRateLimitStore {
    pool: PgPool,
}

impl PgRateLimitStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl RateLimitStore for PgRateLimitStore {
    async fn check_and_consume(
        &self,
        key: &RateKey,
        policy: &RatePolicy,
        now_ms: i64,
    ) -> ThrottleResult<RateDecision> {
        let row = sqlx::query(
            r#"
            INSERT INTO rate_limit_windows (rate_key, count, reset_at_ms)
            VALUES ($1, 1, $2)
            ON CONFLICT (rate_key)
            DO UPDATE SET
                count = CASE
                    WHEN rate_limit_windows.reset_at_ms <= $3 THEN 1
                    ELSE rate_limit_windows.count + 1
                END,
                reset_at_ms = CASE
                    WHEN rate_limit_windows.reset_at_ms <= $3 THEN EXCLUDED.reset_at_ms
                    ELSE rate_limit_windows.reset_at_ms
                END
            RETURNING count, reset_at_ms
            "#,
        )
        .bind(key.as_str())
        .bind(now_ms + policy.window_ms())
        .bind(now_ms)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.get("count");
        let reset_at_ms: i64 = row.get("reset_at_ms");
        let count = u32::try_from(count).unwrap_or(u32::MAX);

        Ok(RateDecision {
            allowed: count <= policy.max_requests,
            limit: policy.max_requests,
            remaining: policy.max_requests.saturating_sub(count),
            reset_at_ms,
        })
    }

    async fn purge_expired(&self, now_ms: i64) -> ThrottleResult<u64> {
        let result = sqlx::query("DELETE FROM rate_limit_windows WHERE reset_at_ms <= $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            tracing::info!(purged, "Purged stale rate limit windows");
        }
        Ok(purged)
    }
}
