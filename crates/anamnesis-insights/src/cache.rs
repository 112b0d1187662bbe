use std::collections::HashMap;
use std::time::Duration;

use jiff::Timestamp;
use tokio::sync::Mutex;

use anamnesis_core::models::insight::CachedInsight;

use crate::error::CacheError;
use crate::BoxFuture;

/// Default time-to-live for cached insight payloads.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Payload lookup keyed by `(tenant_id, answers_hash)`.
///
/// An optimisation only: the persisted insight rows are the system of
/// record, and callers treat every error as a miss.
pub trait InsightCache: Send + Sync {
    fn get<'a>(
        &'a self,
        tenant_id: &'a str,
        answers_hash: &'a str,
    ) -> BoxFuture<'a, Result<Option<CachedInsight>, CacheError>>;

    fn set<'a>(
        &'a self,
        tenant_id: &'a str,
        answers_hash: &'a str,
        value: CachedInsight,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<(), CacheError>>;
}

/// Used when no cache backend is configured. Every lookup misses.
pub struct NoopCache;

impl InsightCache for NoopCache {
    fn get<'a>(
        &'a self,
        _tenant_id: &'a str,
        _answers_hash: &'a str,
    ) -> BoxFuture<'a, Result<Option<CachedInsight>, CacheError>> {
        Box::pin(async { Ok(None) })
    }

    fn set<'a>(
        &'a self,
        _tenant_id: &'a str,
        _answers_hash: &'a str,
        _value: CachedInsight,
        _ttl: Duration,
    ) -> BoxFuture<'a, Result<(), CacheError>> {
        Box::pin(async { Ok(()) })
    }
}

struct Entry {
    value: CachedInsight,
    expires_at: Timestamp,
}

/// In-process cache with per-entry expiry.
///
/// Expired entries are dropped lazily on read, or in bulk by
/// [`MemoryCache::purge_expired`]. With a capacity bound, inserting a new
/// key into a full cache evicts the entry closest to expiry.
pub struct MemoryCache {
    entries: Mutex<HashMap<(String, String), Entry>>,
    max_entries: Option<usize>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: None,
        }
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: Some(max_entries.max(1)),
        }
    }

    /// Drop every expired entry. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Timestamp::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        before - entries.len()
    }

    /// Number of stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

fn key(tenant_id: &str, answers_hash: &str) -> (String, String) {
    (tenant_id.to_string(), answers_hash.to_string())
}

impl InsightCache for MemoryCache {
    fn get<'a>(
        &'a self,
        tenant_id: &'a str,
        answers_hash: &'a str,
    ) -> BoxFuture<'a, Result<Option<CachedInsight>, CacheError>> {
        Box::pin(async move {
            let key = key(tenant_id, answers_hash);
            let mut entries = self.entries.lock().await;
            match entries.get(&key) {
                Some(entry) if entry.expires_at > Timestamp::now() => {
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
            entries.remove(&key);
            Ok(None)
        })
    }

    fn set<'a>(
        &'a self,
        tenant_id: &'a str,
        answers_hash: &'a str,
        value: CachedInsight,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<(), CacheError>> {
        Box::pin(async move {
            let now = Timestamp::now();
            let expires_at = now
                .checked_add(ttl)
                .map_err(|e| CacheError::Backend(format!("invalid ttl {ttl:?}: {e}")))?;
            let key = key(tenant_id, answers_hash);

            let mut entries = self.entries.lock().await;
            if let Some(max) = self.max_entries
                && !entries.contains_key(&key)
                && entries.len() >= max
            {
                entries.retain(|_, e| e.expires_at > now);
                if entries.len() >= max {
                    let soonest = entries
                        .iter()
                        .min_by_key(|(_, e)| e.expires_at)
                        .map(|(k, _)| k.clone());
                    if let Some(evicted) = soonest {
                        entries.remove(&evicted);
                    }
                }
            }
            entries.insert(key, Entry { value, expires_at });
            Ok(())
        })
    }
}
