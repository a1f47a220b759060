//! Value Objects

use axum::http::{HeaderMap, header};
use platform::client::extract_user_agent;
use platform::cookie::extract_cookie;
use std::net::IpAddr;

/// Key a CSRF token is stored under
///
/// Derivation precedence:
/// 1. the session-identity cookie value,
/// 2. the Authorization bearer token (prefixed `auth:`),
/// 3. an `anon:{ip}:{user-agent}` composite for anonymous callers.
///
/// The same derivation runs on the issue and verify paths; a client that
/// presents the same credentials lands on the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    /// Key for a known session-identity cookie value
    pub fn from_session_id(session_id: &str) -> Self {
        Self(session_id.to_string())
    }

    /// Key for a bearer-authenticated caller
    pub fn from_bearer(bearer: &str) -> Self {
        Self(format!("auth:{}", bearer))
    }

    /// Fallback key for fully anonymous callers
    pub fn anonymous(client_ip: Option<IpAddr>, user_agent: Option<&str>) -> Self {
        let ip = client_ip
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "127.0.0.1".to_string());
        Self(format!("anon:{}:{}", ip, user_agent.unwrap_or("")))
    }

    /// Derive the session key from request headers
    pub fn derive(
        headers: &HeaderMap,
        client_ip: Option<IpAddr>,
        session_cookie_name: &str,
    ) -> Self {
        if let Some(session_id) = extract_cookie(headers, session_cookie_name) {
            return Self::from_session_id(&session_id);
        }

        if let Some(auth) = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            let bearer = auth.strip_prefix("Bearer ").unwrap_or(auth);
            return Self::from_bearer(bearer);
        }

        let user_agent = extract_user_agent(headers);
        Self::anonymous(client_ip, user_agent.as_deref())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
