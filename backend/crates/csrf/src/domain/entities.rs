//! Domain Entities

use chrono::Utc;
use platform::crypto::constant_time_eq;

/// A CSRF token bound to one session key
///
/// At most one live token exists per session key; issuing a new one
/// overwrites the old.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken {
    pub token: String,
    pub expires_at_ms: i64,
}

impl CsrfToken {
    /// Create a token expiring `ttl_ms` from now
    pub fn new(token: String, ttl_ms: i64) -> Self {
        Self {
            token,
            expires_at_ms: Utc::now().timestamp_millis() + ttl_ms,
        }
    }

    /// Create a token with an explicit expiry timestamp
    pub fn with_expiry(token: String, expires_at_ms: i64) -> Self {
        Self {
            token,
            expires_at_ms,
        }
    }

    /// Check whether the token has expired
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at_ms
    }

    /// Constant-time comparison against a caller-provided token
    pub fn matches(&self, provided: &str) -> bool {
        constant_time_eq(self.token.as_bytes(), provided.as_bytes())
    }
}
