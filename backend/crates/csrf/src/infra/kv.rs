//! Key-Value Repository Implementation
//!
//! Stores tokens in any [`platform::store::KeyValueStore`] under a
//! `csrf:` namespace. Paired with `MemoryKvStore` this is the
//! single-instance/dev deployment; the multi-instance deployment uses
//! the PostgreSQL repository instead.

use crate::domain::entities::CsrfToken;
use crate::domain::repository::CsrfTokenRepository;
use crate::domain::value_objects::SessionKey;
use crate::error::CsrfResult;
use chrono::Utc;
use platform::store::{KeyValueStore, StoredEntry};

const KEY_PREFIX: &str = "csrf:";

/// Token repository over a key-value store
#[derive(Clone)]
pub struct KvTokenRepository<S> {
    store: S,
}

impl<S> KvTokenRepository<S>
where
    S: KeyValueStore + Sync,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn storage_key(session_key: &SessionKey) -> String {
        format!("{}{}", KEY_PREFIX, session_key.as_str())
    }
}

impl<S> CsrfTokenRepository for KvTokenRepository<S>
where
    S: KeyValueStore + Sync,
{
    async fn save(&self, session_key: &SessionKey, token: &CsrfToken) -> CsrfResult<()> {
        let entry = StoredEntry::new(token.token.clone(), token.expires_at_ms);
        let now_ms = Utc::now().timestamp_millis();
        self.store
            .set(&Self::storage_key(session_key), entry, now_ms)
            .await?;
        Ok(())
    }

    async fn find(&self, session_key: &SessionKey, now_ms: i64) -> CsrfResult<Option<CsrfToken>> {
        let entry = self
            .store
            .get(&Self::storage_key(session_key), now_ms)
            .await?;

        Ok(entry.map(|entry| CsrfToken::with_expiry(entry.value, entry.expires_at_ms)))
    }

    async fn delete(&self, session_key: &SessionKey) -> CsrfResult<bool> {
        Ok(self.store.delete(&Self::storage_key(session_key)).await?)
    }

    async fn purge_expired(&self, now_ms: i64) -> CsrfResult<u64> {
        Ok(self.store.purge_expired(now_ms).await?)
    }
}
