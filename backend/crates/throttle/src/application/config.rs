//! Rate Limit Policies

use std::time::Duration;

/// A named fixed-window policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatePolicy {
    /// Stable name, used for key namespacing and guard logs
    pub name: &'static str,
    /// Requests allowed per window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
    /// Key on the authenticated user instead of the client IP
    pub per_user: bool,
}

impl RatePolicy {
    /// General API traffic: 100 requests per 15 minutes per IP
    pub fn api() -> Self {
        Self {
            name: "api",
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
            per_user: false,
        }
    }

    /// Login and credential endpoints: 5 requests per 15 minutes per IP
    pub fn auth() -> Self {
        Self {
            name: "auth",
            max_requests: 5,
            window: Duration::from_secs(15 * 60),
            per_user: false,
        }
    }

    /// File uploads: 10 requests per hour per IP
    pub fn upload() -> Self {
        Self {
            name: "upload",
            max_requests: 10,
            window: Duration::from_secs(60 * 60),
            per_user: false,
        }
    }

    /// NFT minting: 20 requests per hour per user
    pub fn nft_create() -> Self {
        Self {
            name: "nft-create",
            max_requests: 20,
            window: Duration::from_secs(60 * 60),
            per_user: true,
        }
    }

    /// Payment operations: 5 requests per hour per user
    pub fn payment() -> Self {
        Self {
            name: "payment",
            max_requests: 5,
            window: Duration::from_secs(60 * 60),
            per_user: true,
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Outcome of counting one request against a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    /// The policy's `max_requests`, echoed for response headers
    pub limit: u32,
    /// Slots left in the window after this request
    pub remaining: u32,
    /// When the window resets, unix milliseconds
    pub reset_at_ms: i64,
}

impl RateDecision {
    /// Window reset as unix seconds, rounded up
    pub fn reset_at_secs(&self) -> i64 {
        (self.reset_at_ms + 999) / 1000
    }

    /// Whole seconds until the window resets, rounded up, never negative
    pub fn retry_after_secs(&self, now_ms: i64) -> i64 {
        ((self.reset_at_ms - now_ms).max(0) + 999) / 1000
    }
}
