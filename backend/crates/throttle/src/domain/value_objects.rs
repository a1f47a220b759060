//! Value Objects

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Key a window counter is stored under
///
/// Keys are namespaced by policy name so the same client consumes
/// independent budgets per policy. Per-user policies key on the bearer
/// token when one is present and fall back to the client IP otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateKey(String);

impl RateKey {
    /// Key a client by IP under a policy namespace
    pub fn from_ip(policy_name: &str, client_ip: Option<IpAddr>) -> Self {
        let ip = client_ip
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "127.0.0.1".to_string());
        Self(format!("{}:{}", policy_name, ip))
    }

    /// Key an authenticated caller under a policy namespace
    pub fn from_user(policy_name: &str, user_id: &str) -> Self {
        Self(format!("{}:user:{}", policy_name, user_id))
    }

    /// Derive a key from request headers for a per-user policy
    ///
    /// Uses the Authorization bearer token as the user identity and the
    /// client IP when the request is anonymous.
    pub fn for_user_policy(
        policy_name: &str,
        headers: &HeaderMap,
        client_ip: Option<IpAddr>,
    ) -> Self {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|auth| auth.strip_prefix("Bearer ").unwrap_or(auth));

        match bearer {
            Some(user) => Self::from_user(policy_name, user),
            None => Self::from_ip(policy_name, client_ip),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
