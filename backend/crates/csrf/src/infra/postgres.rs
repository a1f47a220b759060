//! PostgreSQL Repository Implementation
//!
//! Shared-store deployment: every instance sees the same tokens, so a
//! token issued by one replica verifies on another.

use crate::domain::entities::CsrfToken;
use crate::domain::repository::CsrfTokenRepository;
use crate::domain::value_objects::SessionKey;
use crate::error::CsrfResult;
use sqlx::{PgPool, Row};

/// PostgreSQL-backed token repository
#[derive(Clone)]
pub struct PgTokenRepository {
    pool: PgPool,
}

impl PgTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CsrfTokenRepository for PgTokenRepository {
    async fn save(&self, session_key: &SessionKey, token: &CsrfToken) -> CsrfResult<()> {
        sqlx::query(
            r#"
            INSERT INTO csrf_tokens (session_key, token, expires_at_ms)
            VALUES ($1, $2, $3)
            ON CONFLICT (session_key)
            DO UPDATE SET token = EXCLUDED.token, expires_at_ms = EXCLUDED.expires_at_ms
            "#,
        )
        .bind(session_key.as_str())
        .bind(&token.token)
        .bind(token.expires_at_ms)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, session_key: &SessionKey, now_ms: i64) -> CsrfResult<Option<CsrfToken>> {
        let row = sqlx::query(
            "SELECT token, expires_at_ms FROM csrf_tokens WHERE session_key = $1",
        )
        .bind(session_key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let token: String = row.get("token");
        let expires_at_ms: i64 = row.get("expires_at_ms");
        let stored = CsrfToken::with_expiry(token, expires_at_ms);

        if stored.is_expired(now_ms) {
            sqlx::query("DELETE FROM csrf_tokens WHERE session_key = $1")
                .bind(session_key.as_str())
                .execute(&self.pool)
                .await?;
            return Ok(None);
        }

        Ok(Some(stored))
    }

    async fn delete(&self, session_key: &SessionKey) -> CsrfResult<bool> {
        let result = sqlx::query("DELETE FROM csrf_tokens WHERE session_key = $1")
            .bind(session_key.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now_ms: i64) -> CsrfResult<u64> {
        let result = sqlx::query("DELETE FROM csrf_tokens WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            tracing::info!(purged, "Purged expired CSRF tokens");
        }
        Ok(purged)
    }
}
