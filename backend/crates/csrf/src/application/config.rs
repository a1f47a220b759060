//! Application Configuration

use axum::http::Method;
use platform::cookie::{CookieConfig, SameSite};
use std::time::Duration;

/// CSRF application configuration
#[derive(Debug, Clone)]
pub struct CsrfConfig {
    /// Length of issued tokens
    pub token_length: usize,
    /// Length of generated session-identity cookie values
    pub session_id_length: usize,
    /// Token lifetime
    pub ttl: Duration,
    /// HTTP-only session-identity cookie name
    pub session_cookie_name: String,
    /// Script-readable token cookie name
    pub token_cookie_name: String,
    /// Request/response header carrying the token
    pub header_name: String,
    /// Whether cookies require Secure
    pub cookie_secure: bool,
    /// SameSite policy for both cookies
    pub cookie_same_site: SameSite,
    /// Path prefixes that skip CSRF gating
    ///
    /// The exemption list is deliberately explicit configuration:
    /// `/api/upload`, `/api/nfts` and `/api/collections` rely on bearer
    /// tokens, which browsers never attach automatically.
    pub exempt_paths: Vec<String>,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            token_length: 32,
            session_id_length: 24,
            ttl: Duration::from_secs(24 * 60 * 60),
            session_cookie_name: "session-id".to_string(),
            token_cookie_name: "csrf-token".to_string(),
            header_name: "x-csrf-token".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            exempt_paths: Self::default_exempt_paths(),
        }
    }
}

impl CsrfConfig {
    /// Create config for development (insecure cookies)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Config that gates every unsafe request, including bearer-auth
    /// endpoints (only infrastructure paths stay exempt)
    pub fn strict() -> Self {
        Self {
            exempt_paths: vec!["/api/health".to_string(), "/api/webhooks".to_string()],
            ..Default::default()
        }
    }

    /// Default exemption list
    pub fn default_exempt_paths() -> Vec<String> {
        [
            "/api/health",
            "/api/webhooks",
            "/api/upload",
            "/api/nfts",
            "/api/collections",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Methods that never require a token
    pub fn is_safe_method(method: &Method) -> bool {
        matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
    }

    /// Whether a path prefix-matches the exemption list
    pub fn is_exempt_path(&self, path: &str) -> bool {
        self.exempt_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Whether a request must present a valid token
    pub fn requires_token(&self, method: &Method, path: &str) -> bool {
        !Self::is_safe_method(method) && !self.is_exempt_path(path)
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl.as_millis() as i64
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl.as_secs() as i64
    }

    /// Cookie carrying the session identity (HTTP-only)
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            same_site: self.cookie_same_site,
            ..CookieConfig::http_only(
                self.session_cookie_name.clone(),
                self.ttl_secs(),
                self.cookie_secure,
            )
        }
    }

    /// Cookie carrying the token itself (readable by scripts)
    pub fn token_cookie(&self) -> CookieConfig {
        CookieConfig {
            same_site: self.cookie_same_site,
            ..CookieConfig::readable(
                self.token_cookie_name.clone(),
                self.ttl_secs(),
                self.cookie_secure,
            )
        }
    }
}
