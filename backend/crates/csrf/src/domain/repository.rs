//! Repository Traits
//!
//! Interfaces for token persistence. Implementations live in the
//! infrastructure layer.

use crate::domain::entities::CsrfToken;
use crate::domain::value_objects::SessionKey;
use crate::error::CsrfResult;

/// CSRF token repository trait
#[trait_variant::make(CsrfTokenRepository: Send)]
pub trait LocalCsrfTokenRepository {
    /// Store a token for a session key, overwriting any prior token
    async fn save(&self, session_key: &SessionKey, token: &CsrfToken) -> CsrfResult<()>;

    /// Look up the live token for a session key
    ///
    /// Expired entries are deleted on lookup and reported absent.
    async fn find(&self, session_key: &SessionKey, now_ms: i64) -> CsrfResult<Option<CsrfToken>>;

    /// Delete the token for a session key, reporting whether it existed
    async fn delete(&self, session_key: &SessionKey) -> CsrfResult<bool>;

    /// Delete every expired token, returning the count removed
    async fn purge_expired(&self, now_ms: i64) -> CsrfResult<u64>;
}
