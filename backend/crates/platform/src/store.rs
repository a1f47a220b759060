//! Key-Value Store Abstraction
//!
//! Transient state (CSRF tokens and similar) lives behind this trait so
//! deployments can choose between a process-local map (single instance,
//! dev/test) and a shared network store (multi-instance). The in-memory
//! implementation lives here; shared implementations live in the
//! consuming crates' infrastructure layers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::sweep::SweepCadence;

/// A stored value with an absolute expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub value: String,
    /// Unix milliseconds; entries past this point are treated as absent
    pub expires_at_ms: i64,
}

impl StoredEntry {
    pub fn new(value: impl Into<String>, expires_at_ms: i64) -> Self {
        Self {
            value: value.into(),
            expires_at_ms,
        }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at_ms
    }
}

/// Store backend failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for key-value store backends
#[trait_variant::make(KeyValueStore: Send)]
pub trait LocalKeyValueStore {
    /// Look up a live entry; expired entries are deleted and reported absent
    async fn get(&self, key: &str, now_ms: i64) -> StoreResult<Option<StoredEntry>>;

    /// Insert or overwrite an entry
    async fn set(&self, key: &str, entry: StoredEntry, now_ms: i64) -> StoreResult<()>;

    /// Delete an entry, reporting whether it existed
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Replace an entry only when the current value matches `expected`
    /// (`None` = key must be absent). Returns whether the swap happened.
    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        entry: StoredEntry,
        now_ms: i64,
    ) -> StoreResult<bool>;

    /// Delete every expired entry, returning the count removed
    async fn purge_expired(&self, now_ms: i64) -> StoreResult<u64>;
}

/// Process-local in-memory store
///
/// Single-instance semantics only: nothing here survives a restart or is
/// visible to sibling processes.
#[derive(Clone)]
pub struct MemoryKvStore {
    entries: Arc<Mutex<HashMap<String, StoredEntry>>>,
    sweep: SweepCadence,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::with_sweep(SweepCadence::default())
    }

    pub fn with_sweep(sweep: SweepCadence) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            sweep,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("kv store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge_locked(entries: &mut HashMap<String, StoredEntry>, now_ms: i64) -> u64 {
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now_ms));
        (before - entries.len()) as u64
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str, now_ms: i64) -> StoreResult<Option<StoredEntry>> {
        let mut entries = self.entries.lock().expect("kv store mutex poisoned");
        match entries.get(key) {
            Some(entry) if entry.is_expired(now_ms) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, entry: StoredEntry, now_ms: i64) -> StoreResult<()> {
        let mut entries = self.entries.lock().expect("kv store mutex poisoned");
        entries.insert(key.to_string(), entry);

        if self.sweep.should_sweep_inline() {
            let purged = Self::purge_locked(&mut entries, now_ms);
            if purged > 0 {
                tracing::debug!(purged, "Opportunistic sweep removed expired entries");
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut entries = self.entries.lock().expect("kv store mutex poisoned");
        Ok(entries.remove(key).is_some())
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        entry: StoredEntry,
        now_ms: i64,
    ) -> StoreResult<bool> {
        let mut entries = self.entries.lock().expect("kv store mutex poisoned");
        let current = entries
            .get(key)
            .filter(|entry| !entry.is_expired(now_ms))
            .map(|entry| entry.value.clone());

        if current.as_deref() == expected {
            entries.insert(key.to_string(), entry);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn purge_expired(&self, now_ms: i64) -> StoreResult<u64> {
        let mut entries = self.entries.lock().expect("kv store mutex poisoned");
        Ok(Self::purge_locked(&mut entries, now_ms))
    }
}
